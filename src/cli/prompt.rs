use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::error::Result;
use crate::request::parse_report_date;

/// One answer from the user. `Exit` ends the session; callers return early
/// instead of the process being terminated from inside the read.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Line(String),
    Exit,
}

pub fn classify(raw: &str) -> Input {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        Input::Exit
    } else {
        Input::Line(trimmed.to_string())
    }
}

/// Print `prompt` and read one line. End of input counts as `Exit`.
pub fn ask_from<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, prompt: &str) -> Result<Input> {
    write!(writer, "{prompt}")?;
    writer.flush()?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(Input::Exit);
    }
    Ok(classify(&line))
}

pub fn ask(prompt: &str) -> Result<Input> {
    let stdin = std::io::stdin();
    ask_from(&mut stdin.lock(), &mut std::io::stdout(), prompt)
}

/// Ask for a date until a valid one is given. Blank means `today`.
pub fn ask_date_from<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
    today: NaiveDate,
) -> Result<Option<NaiveDate>> {
    loop {
        match ask_from(reader, writer, prompt)? {
            Input::Exit => return Ok(None),
            Input::Line(s) if s.is_empty() => {
                writeln!(writer, "No date entered. Defaulting to today's date: {today}")?;
                return Ok(Some(today));
            }
            Input::Line(s) => match parse_report_date(&s) {
                Ok(d) => return Ok(Some(d)),
                Err(e) => writeln!(writer, "{e}")?,
            },
        }
    }
}

/// Prompt for a single date or a range. `None` when the user exits.
pub fn ask_date_range_from<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    today: NaiveDate,
) -> Result<Option<(NaiveDate, NaiveDate)>> {
    writeln!(writer, "Reporting time range:\n1. Specific date\n2. Range of dates\n")?;
    loop {
        match ask_from(reader, writer, "Enter 1 or 2 ('exit' to quit): ")? {
            Input::Exit => return Ok(None),
            Input::Line(s) if s == "1" => {
                let Some(d) = ask_date_from(reader, writer, "Date (YYYY-MM-DD or YYYYMMDD, blank for today): ", today)? else {
                    return Ok(None);
                };
                return Ok(Some((d, d)));
            }
            Input::Line(s) if s == "2" => {
                let Some(start) = ask_date_from(reader, writer, "Start date (blank for today): ", today)? else {
                    return Ok(None);
                };
                let Some(end) = ask_date_from(reader, writer, "End date (blank for today): ", today)? else {
                    return Ok(None);
                };
                return Ok(Some((start, end)));
            }
            Input::Line(_) => writeln!(writer, "Invalid option.")?,
        }
    }
}

pub fn ask_date_range(today: NaiveDate) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let stdin = std::io::stdin();
    ask_date_range_from(&mut stdin.lock(), &mut std::io::stdout(), today)
}
