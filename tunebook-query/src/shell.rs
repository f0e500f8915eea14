//! Interactive query shell
//!
//! Numbered menu over an already loaded [`TuneTable`]. The shell reads
//! commands from any `BufRead` and writes to any `Write`, so a session can be
//! scripted. End of input ends the session like the Exit entry.

use std::io::{BufRead, Write};

use tracing::debug;
use tunebook_common::Result;

use crate::render::{render_counts, render_rows, Column};
use crate::table::TuneTable;

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowAll,
    ByBook,
    ByType,
    ByTitle,
    Statistics,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::ShowAll),
            "2" => Some(MenuChoice::ByBook),
            "3" => Some(MenuChoice::ByType),
            "4" => Some(MenuChoice::ByTitle),
            "5" => Some(MenuChoice::Statistics),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "\n=== ABC Tunes Database ===\n\
1. Show all tunes\n\
2. Search tunes by book\n\
3. Search tunes by type\n\
4. Search tunes by title\n\
5. Show statistics\n\
6. Exit\n";

/// Console session over one table
pub struct QueryShell<'t, R, W> {
    table: &'t TuneTable,
    input: R,
    output: W,
}

impl<'t, R: BufRead, W: Write> QueryShell<'t, R, W> {
    pub fn new(table: &'t TuneTable, input: R, output: W) -> Self {
        Self {
            table,
            input,
            output,
        }
    }

    /// Run the menu loop until Exit or end of input
    pub fn run(&mut self) -> Result<()> {
        if self.table.is_empty() {
            writeln!(self.output, "No tunes found in database!")?;
            return Ok(());
        }

        writeln!(self.output, "\nLoaded {} tunes from database", self.table.len())?;

        loop {
            write!(self.output, "{}", MENU)?;

            let Some(choice) = self.prompt("\nEnter your choice (1-6): ")? else {
                break;
            };
            debug!("Menu choice: {:?}", choice);

            let keep_going = match MenuChoice::parse(&choice) {
                Some(MenuChoice::ShowAll) => self.show_all()?,
                Some(MenuChoice::ByBook) => self.search_by_book()?,
                Some(MenuChoice::ByType) => self.search_by_type()?,
                Some(MenuChoice::ByTitle) => self.search_by_title()?,
                Some(MenuChoice::Statistics) => self.show_statistics()?,
                Some(MenuChoice::Exit) => false,
                None => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    true
                }
            };

            if !keep_going {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Print `text` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn show_all(&mut self) -> Result<bool> {
        let rows = self.table.all();
        writeln!(self.output, "\nAll tunes ({} total):", rows.len())?;
        write!(
            self.output,
            "{}",
            render_rows(rows, &[Column::BookNumber, Column::Title, Column::TuneType])
        )?;
        Ok(true)
    }

    fn search_by_book(&mut self) -> Result<bool> {
        let Some(input) = self.prompt("Enter book number: ")? else {
            return Ok(false);
        };

        let book_number = match parse_book_input(&input) {
            Some(n) => n,
            None => {
                writeln!(self.output, "Book number must be a whole number")?;
                return Ok(true);
            }
        };

        let rows = self.table.by_book(book_number);
        if rows.is_empty() {
            writeln!(self.output, "No tunes found in book {}", book_number)?;
        } else {
            writeln!(self.output, "\nTunes from book {}:", book_number)?;
            write!(
                self.output,
                "{}",
                render_rows(rows, &[Column::Title, Column::TuneType])
            )?;
        }
        Ok(true)
    }

    fn search_by_type(&mut self) -> Result<bool> {
        let Some(term) = self.prompt("Enter tune type (e.g., jig, reel): ")? else {
            return Ok(false);
        };

        let rows = self.table.by_type(&term);
        if rows.is_empty() {
            writeln!(self.output, "No {} tunes found", term)?;
        } else {
            writeln!(self.output, "\n{} {} tunes found:", rows.len(), term)?;
            write!(
                self.output,
                "{}",
                render_rows(rows, &[Column::BookNumber, Column::Title])
            )?;
        }
        Ok(true)
    }

    fn search_by_title(&mut self) -> Result<bool> {
        let Some(term) = self.prompt("Enter title search term: ")? else {
            return Ok(false);
        };

        let rows = self.table.search_title(&term);
        if rows.is_empty() {
            writeln!(self.output, "No tunes found containing '{}'", term)?;
        } else {
            writeln!(self.output, "\n{} tunes containing '{}':", rows.len(), term)?;
            write!(
                self.output,
                "{}",
                render_rows(rows, &[Column::BookNumber, Column::Title, Column::TuneType])
            )?;
        }
        Ok(true)
    }

    fn show_statistics(&mut self) -> Result<bool> {
        let stats = self.table.stats();
        writeln!(self.output, "\n=== Database Statistics ===")?;
        writeln!(self.output, "Total tunes: {}", stats.total)?;
        writeln!(self.output, "Books: {}", stats.books)?;
        writeln!(self.output, "\nTune types:")?;
        write!(self.output, "{}", render_counts(&stats.by_type))?;
        writeln!(self.output, "\nKeys:")?;
        write!(self.output, "{}", render_counts(&stats.by_key))?;
        Ok(true)
    }
}

/// Digits only, as typed at the prompt
fn parse_book_input(input: &str) -> Option<i64> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}
