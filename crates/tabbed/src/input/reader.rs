//! Streaming reader over a tabbed file.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Result, TabbedError};
use crate::record::{FromRow, Row};
use crate::schema::{Schema, schema_from_tokens, untyped_schema};

use super::options::ReaderOptions;
use super::split::Splitter;

type Factory<T> = Box<dyn FnMut(Row) -> Result<T> + Send>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A lazy, forward-only sequence of records read from a delimited file.
///
/// Each call to [`Iterator::next`] reads at most one data line. Rows that
/// fail to parse are yielded as `Err` and iteration can continue with the
/// next line. The underlying stream is released once the end is reached,
/// after a read failure, on [`close`](Self::close), or on drop.
///
/// ```no_run
/// use tabbed::{ReaderOptions, TabbedFile};
///
/// let file = TabbedFile::open("hits.tsv", ReaderOptions::default())?;
/// for record in file {
///     let record = record?;
///     println!("{} {}", record.get_str("s1")?, record.get_float("f1")?);
/// }
/// # Ok::<(), tabbed::TabbedError>(())
/// ```
pub struct TabbedFile<R, T = Row> {
    source: Option<R>,
    schema: Arc<Schema>,
    splitter: Splitter,
    skip_blank_lines: bool,
    comment: Option<u8>,
    factory: Factory<T>,
    line_buf: Vec<u8>,
    line_number: usize,
    /// `line_buf` holds a data line that was read during open.
    pending: bool,
    records_read: usize,
}

/// What a freshly read line is.
enum LineKind {
    Blank,
    Comment,
    Data,
}

impl TabbedFile<BufReader<File>, Row> {
    /// Open a file, reading its header if the options say it has one.
    pub fn open(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        options.validate()?;

        let file = File::open(path).map_err(|e| TabbedError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader = Self::from_reader(BufReader::new(file), options)?;
        debug!(
            path = %path.display(),
            columns = reader.schema.len(),
            "opened tabbed file"
        );
        Ok(reader)
    }

    /// Open a file and build each row with `factory`.
    pub fn open_with<T, F>(
        path: impl AsRef<Path>,
        options: ReaderOptions,
        factory: F,
    ) -> Result<TabbedFile<BufReader<File>, T>>
    where
        F: FnMut(Row) -> Result<T> + Send + 'static,
    {
        Ok(Self::open(path, options)?.with_factory(factory))
    }

    /// Open a file and build each row as `T`.
    pub fn open_as<T: FromRow + 'static>(
        path: impl AsRef<Path>,
        options: ReaderOptions,
    ) -> Result<TabbedFile<BufReader<File>, T>> {
        Self::open_with(path, options, T::from_row)
    }
}

impl<R: BufRead> TabbedFile<R, Row> {
    /// Read from any buffered stream.
    pub fn from_reader(source: R, options: ReaderOptions) -> Result<Self> {
        options.validate()?;

        let mut reader = TabbedFile {
            source: Some(source),
            schema: Arc::new(Schema::default()),
            splitter: Splitter::from_options(&options),
            skip_blank_lines: options.skip_blank_lines,
            comment: options.comment,
            factory: Box::new(<Row as FromRow>::from_row),
            line_buf: Vec::with_capacity(1024),
            line_number: 0,
            pending: false,
            records_read: 0,
        };

        let schema = reader.resolve_schema(&options)?;
        debug!(
            columns = schema.len(),
            header = options.has_header,
            explicit = options.schema.is_some(),
            "resolved schema"
        );
        reader.schema = Arc::new(schema);
        Ok(reader)
    }
}

impl<R: BufRead, T> TabbedFile<R, T> {
    /// Replace the record-construction strategy.
    pub fn with_factory<U, F>(self, factory: F) -> TabbedFile<R, U>
    where
        F: FnMut(Row) -> Result<U> + Send + 'static,
    {
        TabbedFile {
            source: self.source,
            schema: self.schema,
            splitter: self.splitter,
            skip_blank_lines: self.skip_blank_lines,
            comment: self.comment,
            factory: Box::new(factory),
            line_buf: self.line_buf,
            line_number: self.line_number,
            pending: self.pending,
            records_read: self.records_read,
        }
    }

    /// The schema every record from this file shares.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of the last line read (1-based, header included).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of records yielded successfully so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Whether iteration has ended.
    pub fn is_exhausted(&self) -> bool {
        self.source.is_none() && !self.pending
    }

    /// Release the stream now. Further iteration yields nothing.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!(lines = self.line_number, records = self.records_read, "closed tabbed file");
        }
        self.pending = false;
    }

    fn resolve_schema(&mut self, options: &ReaderOptions) -> Result<Schema> {
        if options.has_header {
            if !self.next_content_line()? {
                return match &options.schema {
                    Some(schema) => Ok(schema.clone()),
                    None => Err(TabbedError::Schema("missing header line".to_string())),
                };
            }
            self.read_header(options)
        } else if let Some(schema) = &options.schema {
            Ok(schema.clone())
        } else {
            // Size an all-string schema from the first data line, then
            // keep that line for the first record.
            if !self.next_content_line()? {
                return Ok(Schema::default());
            }
            let line = std::str::from_utf8(&self.line_buf)
                .map_err(|_| TabbedError::Schema("first line is not valid UTF-8".to_string()))?;
            let width = self
                .splitter
                .split(line)
                .map_err(|e| e.at_line(self.line_number))?
                .len();
            self.pending = true;
            untyped_schema(width)
        }
    }

    fn read_header(&self, options: &ReaderOptions) -> Result<Schema> {
        let line = std::str::from_utf8(&self.line_buf)
            .map_err(|_| TabbedError::Schema("header is not valid UTF-8".to_string()))?;
        let tokens = self.splitter.split(line).map_err(|e| e.at_line(self.line_number))?;

        match &options.schema {
            Some(schema) if schema.len() != tokens.len() => Err(TabbedError::Schema(format!(
                "header has {} columns but the schema has {}",
                tokens.len(),
                schema.len()
            ))),
            Some(schema) => Ok(schema.clone()),
            None => schema_from_tokens(tokens.iter().map(|t| &**t), options.ordinal_rule),
        }
    }

    /// Read lines until one that is not skipped. Used while opening, where
    /// read failures are fatal.
    fn next_content_line(&mut self) -> Result<bool> {
        loop {
            match self.read_line() {
                None => return Ok(false),
                Some(Err(e)) => return Err(e),
                Some(Ok(LineKind::Data)) => return Ok(true),
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Read one line into `line_buf`, without its terminator.
    ///
    /// Returns `None` at end of stream, releasing it.
    fn read_line(&mut self) -> Option<Result<LineKind>> {
        let source = self.source.as_mut()?;
        self.line_buf.clear();

        match source.read_until(b'\n', &mut self.line_buf) {
            Ok(0) => {
                self.source = None;
                debug!(lines = self.line_number, records = self.records_read, "tabbed file exhausted");
                None
            }
            Ok(_) => {
                self.line_number += 1;
                if self.line_number == 1 && self.line_buf.starts_with(UTF8_BOM) {
                    self.line_buf.drain(..UTF8_BOM.len());
                }
                if self.line_buf.last() == Some(&b'\n') {
                    self.line_buf.pop();
                    if self.line_buf.last() == Some(&b'\r') {
                        self.line_buf.pop();
                    }
                }

                let kind = if self.line_buf.is_empty() {
                    if self.skip_blank_lines { LineKind::Blank } else { LineKind::Data }
                } else if self.comment.is_some() && self.line_buf.first() == self.comment.as_ref() {
                    LineKind::Comment
                } else {
                    LineKind::Data
                };
                Some(Ok(kind))
            }
            Err(source) => {
                self.source = None;
                Some(Err(TabbedError::Read {
                    line: self.line_number + 1,
                    source,
                }))
            }
        }
    }

    /// Turn the line in `line_buf` into a record.
    fn build_record(&mut self) -> Result<T> {
        let line_number = self.line_number;

        let line = std::str::from_utf8(&self.line_buf)
            .map_err(|_| TabbedError::Encoding { line: line_number })?;
        let fields = self.splitter.split(line).map_err(|e| e.at_line(line_number))?;
        let row = Row::new(Arc::clone(&self.schema), &fields).map_err(|e| e.at_line(line_number))?;

        (self.factory)(row).map_err(|e| {
            if e.is_row_error() {
                e.at_line(line_number)
            } else {
                TabbedError::Record {
                    line: line_number,
                    message: e.to_string(),
                }
            }
        })
    }
}

impl<R: BufRead, T> Iterator for TabbedFile<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending {
            self.pending = false;
        } else {
            loop {
                match self.read_line()? {
                    Ok(LineKind::Data) => break,
                    Ok(LineKind::Blank) => trace!(line = self.line_number, "skipping blank line"),
                    Ok(LineKind::Comment) => trace!(line = self.line_number, "skipping comment line"),
                    Err(e) => return Some(Err(e)),
                }
            }
        }

        let result = self.build_record();
        match &result {
            Ok(_) => self.records_read += 1,
            Err(e) => debug!(line = self.line_number, error = %e, "row failed"),
        }
        Some(result)
    }
}

impl<R: BufRead, T> FusedIterator for TabbedFile<R, T> {}

impl<R, T> fmt::Debug for TabbedFile<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabbedFile")
            .field("schema", &self.schema)
            .field("line_number", &self.line_number)
            .field("records_read", &self.records_read)
            .field("open", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSpec, ColumnType};
    use std::io::{self, Read};

    /// Serves `data`, then fails every read.
    struct FailingSource {
        data: &'static [u8],
    }

    impl Read for FailingSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::other("disk gone"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn read(data: &str, options: ReaderOptions) -> TabbedFile<&[u8]> {
        TabbedFile::from_reader(data.as_bytes(), options).unwrap()
    }

    #[test]
    fn test_reads_typed_rows() {
        let mut file = read("s1\ti1\tf1\nfoo\t42\t3.5\nbar\t-1\t1e2\n", ReaderOptions::default());

        let first = file.next().unwrap().unwrap();
        assert_eq!(first.get_str("s1").unwrap(), "foo");
        assert_eq!(first.get_int("i1").unwrap(), 42);
        assert_eq!(first.get_float("f1").unwrap(), 3.5);

        let second = file.next().unwrap().unwrap();
        assert_eq!(second.get_float("f1").unwrap(), 100.0);

        assert!(file.next().is_none());
        assert!(file.is_exhausted());
        assert_eq!(file.records_read(), 2);
    }

    #[test]
    fn test_bad_row_does_not_stop_iteration() {
        let mut file = read("s1\ti1\na\t1\nb\nc\tx\nd\t4\n", ReaderOptions::default());

        assert!(file.next().unwrap().is_ok());
        assert!(matches!(file.next().unwrap(), Err(TabbedError::RowShape { line: 3, .. })));
        assert!(matches!(file.next().unwrap(), Err(TabbedError::TypeCoercion { line: 4, .. })));
        assert_eq!(file.next().unwrap().unwrap().get_int("i1").unwrap(), 4);
        assert!(file.next().is_none());
    }

    #[test]
    fn test_blank_lines() {
        let data = "s1\n\na\n\r\nb\n";
        assert_eq!(read(data, ReaderOptions::default()).count(), 2);

        let options = ReaderOptions {
            skip_blank_lines: false,
            ..Default::default()
        };
        let rows: Vec<_> = read(data, options).collect::<Result<_>>().unwrap();
        let values: Vec<_> = rows.iter().map(|r| r.get_str("s1").unwrap()).collect();
        assert_eq!(values, vec!["", "a", "", "b"]);
    }

    #[test]
    fn test_comment_lines() {
        let options = ReaderOptions {
            comment: Some(b'#'),
            ..Default::default()
        };
        let file = read("# produced by aligner\ni1\n1\n# mid\n2\n", options);
        let values: Vec<i64> = file.map(|r| r.unwrap().get_int("i1").unwrap()).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_missing_header() {
        let err = TabbedFile::from_reader("".as_bytes(), ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, TabbedError::Schema(_)));
    }

    #[test]
    fn test_headerless_untyped() {
        let options = ReaderOptions {
            has_header: false,
            ..Default::default()
        };
        let mut file = read("\nx\ty\n1\t2\n", options);
        assert_eq!(file.schema().accessors(), vec!["s1", "s2"]);

        let first = file.next().unwrap().unwrap();
        assert_eq!(first.get_str("s2").unwrap(), "y");
        assert_eq!(file.line_number(), 2);
        assert_eq!(file.next().unwrap().unwrap().get_str("s1").unwrap(), "1");
        assert!(file.next().is_none());
    }

    #[test]
    fn test_headerless_empty_stream() {
        let options = ReaderOptions {
            has_header: false,
            ..Default::default()
        };
        let mut file = read("", options);
        assert!(file.schema().is_empty());
        assert!(file.next().is_none());
    }

    #[test]
    fn test_invalid_utf8_row() {
        let data: &[u8] = b"s1\nok\n\xff\xfe\nafter\n";
        let mut file = TabbedFile::from_reader(data, ReaderOptions::default()).unwrap();

        assert!(file.next().unwrap().is_ok());
        assert!(matches!(file.next().unwrap(), Err(TabbedError::Encoding { line: 3 })));
        assert_eq!(file.next().unwrap().unwrap().get_str("s1").unwrap(), "after");
    }

    #[test]
    fn test_close_releases_stream() {
        let mut file = read("i1\n1\n2\n", ReaderOptions::default());
        assert!(file.next().is_some());
        file.close();
        assert!(file.is_exhausted());
        assert!(file.next().is_none());
    }

    #[test]
    fn test_factory_failure_is_row_level() {
        let file = read("i1\n1\n-2\n3\n", ReaderOptions::default()).with_factory(|row: Row| {
            let value = row.get_int("i1")?;
            if value < 0 {
                return Err(TabbedError::UnknownField("negative".to_string()));
            }
            Ok(value)
        });

        let results: Vec<_> = file.collect();
        assert_eq!(results.len(), 3);
        assert!(matches!(results[1], Err(TabbedError::Record { line: 3, .. })));
        assert_eq!(*results[2].as_ref().unwrap(), 3);
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let file = read("\u{feff}s1\ti1\na\t1\n", ReaderOptions::default());
        assert_eq!(file.schema().accessors(), vec!["s1", "i1"]);
    }

    #[test]
    fn test_bom_stripped_headerless() {
        let options = ReaderOptions {
            has_header: false,
            ..Default::default()
        };
        let mut file = read("\u{feff}7\tx\n8\ty\n", options);
        assert_eq!(file.schema().accessors(), vec!["s1", "s2"]);
        assert_eq!(file.next().unwrap().unwrap().get_str("s1").unwrap(), "7");
    }

    #[test]
    fn test_bom_stripped_with_explicit_schema() {
        let schema = Schema::from_columns(vec![ColumnSpec::new("n", ColumnType::Integer)]).unwrap();
        let file = read("\u{feff}7\n8\n", ReaderOptions::with_schema(schema));

        let values: Vec<i64> = file.map(|r| r.unwrap().get_int("n").unwrap()).collect();
        assert_eq!(values, vec![7, 8]);
    }

    #[test]
    fn test_bom_before_comment_line() {
        let options = ReaderOptions {
            comment: Some(b'#'),
            ..Default::default()
        };
        let mut file = read("\u{feff}# note\ni1\n1\n", options);
        assert_eq!(file.schema().accessors(), vec!["i1"]);
        assert_eq!(file.next().unwrap().unwrap().get_int("i1").unwrap(), 1);
    }

    #[test]
    fn test_bom_only_on_first_line() {
        let mut file = read("s1\n\u{feff}a\n", ReaderOptions::default());
        assert_eq!(file.next().unwrap().unwrap().get_str("s1").unwrap(), "\u{feff}a");
    }

    #[test]
    fn test_headerless_invalid_utf8_first_line() {
        let options = ReaderOptions {
            has_header: false,
            ..Default::default()
        };
        let data: &[u8] = b"\xff\tx\n";
        let err = TabbedFile::from_reader(data, options).unwrap_err();

        assert!(matches!(err, TabbedError::Schema(_)));
        assert!(!err.is_row_error());
    }

    #[test]
    fn test_read_failure_mid_stream_ends_iteration() {
        let source = io::BufReader::new(FailingSource { data: b"i1\n1\n2" });
        let mut file = TabbedFile::from_reader(source, ReaderOptions::default()).unwrap();

        assert_eq!(file.next().unwrap().unwrap().get_int("i1").unwrap(), 1);

        let err = file.next().unwrap().unwrap_err();
        assert!(matches!(err, TabbedError::Read { line: 3, .. }));
        assert!(!err.is_row_error());

        assert!(file.next().is_none());
        assert!(file.is_exhausted());
        assert_eq!(file.records_read(), 1);
    }

    #[test]
    fn test_read_failure_on_header_fails_open() {
        let source = io::BufReader::new(FailingSource { data: b"" });
        let err = TabbedFile::from_reader(source, ReaderOptions::default()).unwrap_err();

        assert!(matches!(err, TabbedError::Read { line: 1, .. }));
        assert_eq!(err.category(), crate::ErrorCategory::Io);
    }
}
