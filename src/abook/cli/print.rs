use abook::api::{CmdMessage, CmdResult, MessageLevel};
use abook::error::BookError;
use abook::model::Record;
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

const NAME_MAX_WIDTH: usize = 24;

/// Messages first, so headers like "Contacts found:" precede the records.
pub(super) fn print_result(result: &CmdResult) {
    print_messages(&result.messages);
    print_records(&result.listed_records);
    print_pages(&result.pages);
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_error(err: &BookError) {
    print_messages(&[CmdMessage::error(err.to_string())]);
}

fn print_records(records: &[Record]) {
    for record in records {
        println!("{}", record.to_display_string());
    }
}

fn print_pages(pages: &[Vec<Record>]) {
    let name_width = pages
        .iter()
        .flatten()
        .map(|r| r.name().width())
        .max()
        .unwrap_or(0)
        .min(NAME_MAX_WIDTH);

    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        if total > 1 {
            println!("{}", format!("-- page {}/{} --", i + 1, total).dimmed());
        }
        for record in page {
            println!("{}", format_row(record, name_width));
        }
    }
}

/// `name  phones  birthday`, with the name column padded to `name_width`.
fn format_row(record: &Record, name_width: usize) -> String {
    let name = record.name();
    let padding = name_width.saturating_sub(name.width());
    let phones = record
        .phones()
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    let birthday = record
        .birthday()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{}{}  {}  {}",
        name.bold(),
        " ".repeat(padding),
        if phones.is_empty() { "-".to_string() } else { phones },
        birthday.dimmed()
    )
}
