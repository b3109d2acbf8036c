//! services/api/src/adapters/csv_store.rs
//!
//! Flat-file record logs. Implements the `DeedLog` and `MoodLog` ports from the
//! `core` crate on top of CSV files.
//!
//! Every mutation other than an append reads the whole file and rewrites it. A
//! per-log mutex serializes writers inside this process; across processes the
//! last writer wins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use karma_core::{
    domain::{DeedRecord, DeedRow, MoodRecord},
    ports::{DeedLog, MoodLog, PortError, PortResult},
};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{info, warn};

const MOOD_HEADER: [&str; 3] = ["emoji", "note", "timestamp"];

fn unexpected(e: impl std::fmt::Display) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Reads a file, treating a missing file as empty.
async fn read_or_empty(path: &Path) -> PortResult<Vec<u8>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(unexpected(e)),
    }
}

async fn ensure_parent(path: &Path) -> PortResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await.map_err(unexpected)
        }
        _ => Ok(()),
    }
}

fn read_raw_rows(bytes: &[u8], has_headers: bool) -> PortResult<Vec<StringRecord>> {
    ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(bytes)
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(unexpected)
}

fn encode_rows<I, R>(rows: I) -> PortResult<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).map_err(unexpected)?;
    }
    writer.into_inner().map_err(unexpected)
}

async fn append_bytes(path: &Path, bytes: &[u8]) -> PortResult<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(unexpected)?;
    file.write_all(bytes).await.map_err(unexpected)?;
    file.flush().await.map_err(unexpected)
}

//=========================================================================================
// Deed Log
//=========================================================================================

/// Header-less `description,points,reason` rows.
pub struct CsvDeedLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvDeedLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl DeedLog for CsvDeedLog {
    async fn list(&self) -> PortResult<Vec<(usize, DeedRecord)>> {
        let _guard = self.lock.lock().await;
        let bytes = read_or_empty(&self.path).await?;
        let rows = read_raw_rows(&bytes, false)?;

        let mut deeds = Vec::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            let fields: Vec<&str> = row.iter().collect();
            match DeedRow::from_fields(&fields) {
                Some(parsed) => deeds.push((position, DeedRecord::from(parsed))),
                None => warn!(position, ?fields, "Skipping deed row with non-integer points"),
            }
        }
        Ok(deeds)
    }

    async fn append(&self, deed: DeedRecord) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        ensure_parent(&self.path).await?;
        let points = deed.points.to_string();
        let bytes = encode_rows([[deed.description.as_str(), points.as_str(), deed.reason.as_str()]])?;
        append_bytes(&self.path, &bytes).await
    }

    async fn delete_at(&self, index: usize) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(unexpected(e)),
        };
        let mut rows = read_raw_rows(&bytes, false)?;
        if index < rows.len() {
            rows.remove(index);
            info!(index, "Deleted deed row");
        }
        let encoded = encode_rows(rows.iter())?;
        fs::write(&self.path, encoded).await.map_err(unexpected)
    }
}

//=========================================================================================
// Mood Log
//=========================================================================================

/// `emoji,note,timestamp` rows under a header line.
pub struct CsvMoodLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvMoodLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Creates the file with its header row if it does not exist yet.
    async fn ensure_exists(&self) -> PortResult<()> {
        if fs::try_exists(&self.path).await.map_err(unexpected)? {
            return Ok(());
        }
        ensure_parent(&self.path).await?;
        fs::write(&self.path, encode_rows([MOOD_HEADER])?)
            .await
            .map_err(unexpected)
    }

    async fn read_all(&self) -> PortResult<Vec<MoodRecord>> {
        let bytes = read_or_empty(&self.path).await?;
        let rows = read_raw_rows(&bytes, true)?;
        // Short rows are kept with the missing columns empty, so a rewrite
        // never drops them.
        let moods = rows
            .iter()
            .map(|row| {
                let field = |i| row.get(i).unwrap_or_default().to_string();
                MoodRecord {
                    emoji: field(0),
                    note: field(1),
                    timestamp: field(2),
                }
            })
            .collect();
        Ok(moods)
    }
}

#[async_trait]
impl MoodLog for CsvMoodLog {
    async fn list_recent_first(&self) -> PortResult<Vec<MoodRecord>> {
        let _guard = self.lock.lock().await;
        self.ensure_exists().await?;
        let mut moods = self.read_all().await?;
        moods.reverse();
        Ok(moods)
    }

    async fn append(&self, mood: MoodRecord) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        self.ensure_exists().await?;
        let bytes = encode_rows([[
            mood.emoji.as_str(),
            mood.note.as_str(),
            mood.timestamp.as_str(),
        ]])?;
        append_bytes(&self.path, &bytes).await
    }

    async fn delete_by_timestamp(&self, timestamp: &str) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        self.ensure_exists().await?;
        let kept: Vec<MoodRecord> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|mood| mood.timestamp != timestamp)
            .collect();

        let rows = std::iter::once(MOOD_HEADER.map(String::from)).chain(
            kept.into_iter()
                .map(|mood| [mood.emoji, mood.note, mood.timestamp]),
        );
        fs::write(&self.path, encode_rows(rows)?)
            .await
            .map_err(unexpected)
    }
}
