//! ABC tune record parser
//!
//! Splits the lines of one ABC file into [`TuneRecord`]s. Only the header
//! lines needed for the `tunes` table are recognized:
//!
//! | Prefix | Field        |
//! |--------|--------------|
//! | `X:`   | sequence id, starts a record |
//! | `T:`   | title        |
//! | `R:`   | tune type    |
//! | `K:`   | key          |
//! | `M:`   | meter        |
//!
//! A record runs from its `X:` line to the next blank line, the next `X:` line
//! or the end of input. Lines outside a record are ignored. A record with
//! nothing after its `X:` line is dropped.
//!
//! Parsing is total: any text produces some (possibly empty) list of records.

use tunebook_common::TuneRecord;

const START_PREFIX: &str = "X:";

/// Recognized header line, decided on the raw (unstripped) line
enum Line<'a> {
    Start(&'a str),
    Title(&'a str),
    TuneType(&'a str),
    Key(&'a str),
    Meter(&'a str),
    Blank,
    Other,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix(START_PREFIX) {
            return Line::Start(rest.trim());
        }
        if let Some(rest) = line.strip_prefix("T:") {
            return Line::Title(rest.trim());
        }
        if let Some(rest) = line.strip_prefix("R:") {
            return Line::TuneType(rest.trim());
        }
        if let Some(rest) = line.strip_prefix("K:") {
            return Line::Key(rest.trim());
        }
        if let Some(rest) = line.strip_prefix("M:") {
            return Line::Meter(rest.trim());
        }
        if line.trim().is_empty() {
            return Line::Blank;
        }
        Line::Other
    }
}

/// Record under construction
#[derive(Debug)]
struct TuneBuilder {
    record: TuneRecord,
    /// Lines appended after the `X:` line
    body_lines: usize,
}

impl TuneBuilder {
    fn start(sequence_id: &str, line: &str) -> Self {
        Self {
            record: TuneRecord {
                sequence_id: sequence_id.to_string(),
                raw_body: line.to_string(),
                ..Default::default()
            },
            body_lines: 0,
        }
    }

    fn push(&mut self, line: &str) {
        self.record.raw_body.push_str(line);
        self.body_lines += 1;
    }

    /// Sealed record, or `None` for an empty shell
    fn seal(self) -> Option<TuneRecord> {
        (self.body_lines > 0).then_some(self.record)
    }
}

#[derive(Debug)]
enum ParseState {
    Idle,
    InRecord(TuneBuilder),
}

/// Incremental parser: feed lines one at a time, then [`finish`](Self::finish)
#[derive(Debug)]
pub struct TuneParser {
    state: ParseState,
}

impl Default for TuneParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TuneParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
        }
    }

    /// Consume one line (terminator included); returns a record if one was sealed
    pub fn feed_line(&mut self, line: &str) -> Option<TuneRecord> {
        let classified = Line::classify(line);

        if let Line::Start(sequence_id) = classified {
            let previous = std::mem::replace(
                &mut self.state,
                ParseState::InRecord(TuneBuilder::start(sequence_id, line)),
            );
            return match previous {
                ParseState::InRecord(builder) => builder.seal(),
                ParseState::Idle => None,
            };
        }

        if let Line::Blank = classified {
            return match std::mem::replace(&mut self.state, ParseState::Idle) {
                ParseState::InRecord(builder) => builder.seal(),
                ParseState::Idle => None,
            };
        }

        let builder = match &mut self.state {
            ParseState::Idle => return None,
            ParseState::InRecord(builder) => builder,
        };

        let field = match classified {
            Line::Title(value) => Some((&mut builder.record.title, value)),
            Line::TuneType(value) => Some((&mut builder.record.tune_type, value)),
            Line::Key(value) => Some((&mut builder.record.key, value)),
            Line::Meter(value) => Some((&mut builder.record.meter, value)),
            Line::Start(_) | Line::Blank | Line::Other => None,
        };
        if let Some((slot, value)) = field {
            *slot = Some(value.to_string());
        }

        builder.push(line);
        None
    }

    /// End of input: seal the open record, if any
    pub fn finish(self) -> Option<TuneRecord> {
        match self.state {
            ParseState::InRecord(builder) => builder.seal(),
            ParseState::Idle => None,
        }
    }
}

/// Parse an ordered sequence of lines (each with its terminator)
pub fn parse_lines<I, S>(lines: I) -> Vec<TuneRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = TuneParser::new();
    let mut tunes: Vec<TuneRecord> = lines
        .into_iter()
        .filter_map(|line| parser.feed_line(line.as_ref()))
        .collect();
    tunes.extend(parser.finish());
    tunes
}

/// Parse whole file text; line terminators (`\n` or `\r\n`) are kept
pub fn parse_str(text: &str) -> Vec<TuneRecord> {
    parse_lines(text.split_inclusive('\n'))
}

/// Parse raw file bytes; invalid UTF-8 is replaced, never rejected
pub fn parse_bytes(bytes: &[u8]) -> Vec<TuneRecord> {
    parse_str(&String::from_utf8_lossy(bytes))
}
