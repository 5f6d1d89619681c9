// offline dataset builder - converts the csv sources into the sqlite
// bundle and book manifest the mobile app ships with

use crate::Error;
use serde::{Deserialize, Serialize};
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const VERSES_CSV: &str = "Tzotzil_database.csv";
pub const PROMISES_CSV: &str = "promesas.csv";
pub const OUTPUT_DIR: &str = "temp_nevin/assets";

const DB_FILE: &str = "bible.db";
const MANIFEST_FILE: &str = "bible_books.json";

const SCHEMA: [&str; 7] = [
    "CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE NOT NULL,
        book_number INTEGER NOT NULL,
        testament TEXT NOT NULL,
        chapters_count INTEGER DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS verses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL,
        book_name TEXT NOT NULL,
        chapter INTEGER NOT NULL,
        verse INTEGER NOT NULL,
        text_tzotzil TEXT,
        text_spanish TEXT,
        FOREIGN KEY (book_id) REFERENCES books(id)
    )",
    "CREATE TABLE IF NOT EXISTS promises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        image_url TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_verses_book ON verses(book_id)",
    "CREATE INDEX IF NOT EXISTS idx_verses_chapter ON verses(book_id, chapter)",
    "CREATE INDEX IF NOT EXISTS idx_verses_text ON verses(text_spanish)",
    "CREATE INDEX IF NOT EXISTS idx_verses_tzotzil ON verses(text_tzotzil)",
];

// spanish book names; anything not listed counts as new testament
const OLD_TESTAMENT: [&str; 39] = [
    "Génesis",
    "Éxodo",
    "Levítico",
    "Números",
    "Deuteronomio",
    "Josué",
    "Jueces",
    "Rut",
    "1 Samuel",
    "2 Samuel",
    "1 Reyes",
    "2 Reyes",
    "1 Crónicas",
    "2 Crónicas",
    "Esdras",
    "Nehemías",
    "Ester",
    "Job",
    "Salmos",
    "Proverbios",
    "Eclesiastés",
    "Cantares",
    "Isaías",
    "Jeremías",
    "Lamentaciones",
    "Ezequiel",
    "Daniel",
    "Oseas",
    "Joel",
    "Amós",
    "Abdías",
    "Jonás",
    "Miqueas",
    "Nahúm",
    "Habacuc",
    "Sofonías",
    "Hageo",
    "Zacarías",
    "Malaquías",
];

fn testament(book: &str) -> &'static str {
    if OLD_TESTAMENT.contains(&book) { "AT" } else { "NT" }
}

// one row of the bilingual verse csv
#[derive(Deserialize)]
struct VerseRow {
    #[serde(rename = "Libro")]
    book: String,
    #[serde(rename = "Capítulo")]
    chapter: i64,
    #[serde(rename = "Versículo")]
    verse: i64,
    #[serde(rename = "Texto Tzotzil")]
    text_tzotzil: String,
    #[serde(rename = "Texto Español")]
    text_spanish: String,
}

#[derive(Serialize, sqlx::FromRow)]
struct BookRecord {
    id: i64,
    name: String,
    book_number: i64,
    testament: String,
    #[serde(rename = "chapters")]
    chapters_count: i64,
}

pub struct BuildSummary {
    pub books: usize,
    pub verses: usize,
    pub promises: usize,
    pub db_path: PathBuf,
    pub db_bytes: u64,
}

pub struct Builder {
    conn: SqliteConnection,
    out_dir: PathBuf,
}

impl Builder {
    /// One-shot run over both csv sources. Any parse or database error
    /// aborts the whole build; rerun after fixing the input.
    pub async fn run(
        verses_csv: &Path,
        promises_csv: &Path,
        out_dir: &Path,
    ) -> Result<BuildSummary, Error> {
        let mut builder = Self::create(out_dir).await?;

        let (books, verses) = builder.import_verses(verses_csv).await?;
        let promises = builder.import_promises(promises_csv).await?;
        builder.write_manifest().await?;

        builder.finish(books, verses, promises).await
    }

    // fresh database with the schema the mobile app expects
    async fn create(out_dir: &Path) -> Result<Self, Error> {
        fs::create_dir_all(out_dir)?;

        let db_path = out_dir.join(DB_FILE);
        if db_path.exists() {
            fs::remove_file(&db_path)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await?;

        for sql in SCHEMA {
            sqlx::query(sql).execute(&mut conn).await?;
        }

        Ok(Self {
            conn,
            out_dir: out_dir.to_path_buf(),
        })
    }

    // single pass over the csv: book order and per-book chapter sets are
    // only known at the end, so books are inserted first, then verses
    async fn import_verses(&mut self, csv_path: &Path) -> Result<(usize, usize), Error> {
        tracing::info!("importing bible data from {}", csv_path.display());

        let mut order: Vec<String> = Vec::new();
        let mut chapters: HashMap<String, HashSet<i64>> = HashMap::new();
        let mut rows: Vec<VerseRow> = Vec::new();

        let mut reader = csv::Reader::from_path(csv_path)?;
        for result in reader.deserialize() {
            let row: VerseRow = result?;

            let seen = chapters.entry(row.book.clone()).or_insert_with(|| {
                order.push(row.book.clone());
                HashSet::new()
            });
            seen.insert(row.chapter);

            rows.push(row);
        }

        let mut tx = self.conn.begin().await?;

        let mut book_ids: HashMap<String, i64> = HashMap::new();
        for (i, name) in order.iter().enumerate() {
            let result = sqlx::query(
                "INSERT INTO books (name, book_number, testament, chapters_count)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(name)
            .bind(i as i64 + 1)
            .bind(testament(name))
            .bind(chapters[name].len() as i64)
            .execute(&mut *tx)
            .await?;
            book_ids.insert(name.clone(), result.last_insert_rowid());
        }

        for row in &rows {
            sqlx::query(
                "INSERT INTO verses (book_id, book_name, chapter, verse, text_tzotzil, text_spanish)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(book_ids[&row.book])
            .bind(&row.book)
            .bind(row.chapter)
            .bind(row.verse)
            .bind(&row.text_tzotzil)
            .bind(&row.text_spanish)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("imported {} books, {} verses", order.len(), rows.len());
        Ok((order.len(), rows.len()))
    }

    async fn import_promises(&mut self, csv_path: &Path) -> Result<usize, Error> {
        tracing::info!("importing promises from {}", csv_path.display());

        let raw = fs::read_to_string(csv_path)?;
        let content = raw
            .trim_start_matches('\u{feff}')
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        let mut tx = self.conn.begin().await?;
        let mut count = 0;

        // first line is the header
        for line in content.trim().split('\n').skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (text, image_url) = parse_promise_line(line);
            if text.is_empty() || text == "text" {
                continue;
            }

            sqlx::query("INSERT INTO promises (text, image_url) VALUES (?, ?)")
                .bind(&text)
                .bind(&image_url)
                .execute(&mut *tx)
                .await?;
            count += 1;
        }

        tx.commit().await?;

        tracing::info!("imported {count} promises");
        Ok(count)
    }

    // json summary of the books table, bundled next to the database
    async fn write_manifest(&mut self) -> Result<(), Error> {
        let books: Vec<BookRecord> = sqlx::query_as(
            "SELECT id, name, book_number, testament, chapters_count
             FROM books ORDER BY book_number",
        )
        .fetch_all(&mut self.conn)
        .await?;

        let path = self.out_dir.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(&books)?)?;

        tracing::info!("wrote {}", path.display());
        Ok(())
    }

    async fn finish(
        self,
        books: usize,
        verses: usize,
        promises: usize,
    ) -> Result<BuildSummary, Error> {
        let db_path = self.out_dir.join(DB_FILE);
        self.conn.close().await?;

        let db_bytes = fs::metadata(&db_path)?.len();

        Ok(BuildSummary {
            books,
            verses,
            promises,
            db_path,
            db_bytes,
        })
    }
}

// the promises file mixes quoting styles, so try the strictest split
// first and degrade to a plain first-comma split
fn parse_promise_line(line: &str) -> (String, String) {
    if line.contains("\",\"") {
        let mut parts = line.split("\",\"");
        let text = parts.next().unwrap_or("");
        let image_url = parts.next().unwrap_or("");
        (
            text.trim_matches('"').trim().to_string(),
            image_url.trim_matches('"').trim().to_string(),
        )
    } else if line.starts_with('"') && line.contains(',') {
        // quoted text followed by a bare url after the last comma
        let last_comma = line.rfind(',').unwrap_or(0);
        let text = line[1..last_comma].trim().trim_end_matches(['"', ',']).trim();
        let image_url = line[last_comma + 1..].trim();
        (text.to_string(), image_url.to_string())
    } else {
        match line.split_once(',') {
            Some((text, image_url)) => (
                text.trim_matches('"').trim().to_string(),
                image_url.trim_matches('"').trim().to_string(),
            ),
            None => (line.trim_matches('"').trim().to_string(), String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_pair() {
        let (text, image) = parse_promise_line("\"Text with, comma\",\"http://img\"");
        assert_eq!(text, "Text with, comma");
        assert_eq!(image, "http://img");
    }

    #[test]
    fn quoted_text_bare_url() {
        let (text, image) =
            parse_promise_line("\"Dios es amor, siempre\",http://example.com/a.jpg");
        assert_eq!(text, "Dios es amor, siempre");
        assert_eq!(image, "http://example.com/a.jpg");
    }

    #[test]
    fn unquoted_pair() {
        let (text, image) = parse_promise_line("Confía en Jehová,img.png");
        assert_eq!(text, "Confía en Jehová");
        assert_eq!(image, "img.png");
    }

    #[test]
    fn text_without_image() {
        let (text, image) = parse_promise_line("Solo texto");
        assert_eq!(text, "Solo texto");
        assert_eq!(image, "");
    }

    #[test]
    fn testament_lookup() {
        assert_eq!(testament("Génesis"), "AT");
        assert_eq!(testament("Malaquías"), "AT");
        assert_eq!(testament("Mateo"), "NT");
        assert_eq!(testament("Apocalipsis"), "NT");
    }
}
