//! Example: extend records with a computed score.
//!
//! Usage:
//!   cargo run --example secret_score -- <file_path>
//!
//! The file needs a header with at least `s1`, `i1` and `f1` columns, e.g.
//!
//! ```text
//! s1      i1      f1
//! alpha   3       2.5
//! beta    2       -0.5
//! ```

use std::env;

use tabbed::{Computed, FromRow, ReaderOptions, Record, Row, TabbedFile, checked_powf, compute};

/// A row whose score is `f1` raised to `1 / i1`.
struct Hit {
    row: Row,
}

impl Record for Hit {
    fn row(&self) -> &Row {
        &self.row
    }
}

impl FromRow for Hit {
    fn from_row(row: Row) -> tabbed::Result<Self> {
        Ok(Hit { row })
    }
}

impl Hit {
    fn secret_score(&self) -> Computed<f64> {
        compute(|| {
            let root = self.get_int("i1")? as f64;
            checked_powf(self.get_float("f1")?, 1.0 / root)
        })
    }
}

fn main() -> tabbed::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example secret_score -- <file_path>");
        std::process::exit(1);
    }

    let reader = TabbedFile::open_as::<Hit>(&args[1], ReaderOptions::default())?;
    println!("Columns: {}", reader.schema().accessors().join(", "));

    for record in reader {
        let hit = match record {
            Ok(hit) => hit,
            Err(e) => {
                eprintln!("  {}", e);
                continue;
            }
        };

        let name = hit.get_str("s1")?;
        match hit.secret_score().into_option() {
            Some(score) => println!("  {:20} {:.4}", name, score),
            None => println!("  {:20} -", name),
        }
    }

    Ok(())
}
