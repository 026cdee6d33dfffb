//! Sample data for a fresh catalog.
//!
//! Only runs when enabled in config and the books table is empty, so
//! restarting never duplicates rows.

use tracing::{debug, info};

use super::{CreateBook, Database, StoreResult};

struct SampleBook {
    title: &'static str,
    published: i32,
    author: &'static str,
    genres: &'static [&'static str],
}

const SAMPLE_BORN: &[(&str, i32)] = &[
    ("Robert Martin", 1952),
    ("Martin Fowler", 1963),
    ("Fyodor Dostoevsky", 1821),
];

const SAMPLE_BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "Clean Code",
        published: 2008,
        author: "Robert Martin",
        genres: &["refactoring"],
    },
    SampleBook {
        title: "Agile software development",
        published: 2002,
        author: "Robert Martin",
        genres: &["agile", "patterns", "design"],
    },
    SampleBook {
        title: "Refactoring, edition 2",
        published: 2018,
        author: "Martin Fowler",
        genres: &["refactoring"],
    },
    SampleBook {
        title: "Refactoring to patterns",
        published: 2008,
        author: "Joshua Kerievsky",
        genres: &["refactoring", "patterns"],
    },
    SampleBook {
        title: "Practical Object-Oriented Design, An Agile Primer Using Ruby",
        published: 2012,
        author: "Sandi Metz",
        genres: &["refactoring", "design"],
    },
    SampleBook {
        title: "Crime and punishment",
        published: 1866,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "crime"],
    },
    SampleBook {
        title: "Demons",
        published: 1872,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "revolution"],
    },
];

/// Insert the sample catalog into an empty store.
///
/// Returns the number of books inserted (0 when the store already had books).
pub async fn seed_sample_data(db: &Database) -> StoreResult<usize> {
    if db.books().count().await? > 0 {
        debug!("Catalog already has books; skipping sample data");
        return Ok(0);
    }

    for sample in SAMPLE_BOOKS {
        db.books()
            .create(CreateBook {
                title: sample.title.to_string(),
                published: sample.published,
                author: sample.author.to_string(),
                genres: sample.genres.iter().map(|g| g.to_string()).collect(),
            })
            .await?;
    }

    for (name, born) in SAMPLE_BORN {
        db.authors().set_born(name, *born).await?;
    }

    info!(books = SAMPLE_BOOKS.len(), "Seeded sample catalog");
    Ok(SAMPLE_BOOKS.len())
}
