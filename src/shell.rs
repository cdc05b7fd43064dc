//! The interactive menu shell. Everything here is presentation: prompting,
//! retry loops for malformed input, and printing. Catalog decisions happen
//! behind the [`LibraryApi`]; this module only relays them.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use libris::api::LibraryApi;
use libris::commands::{CmdMessage, CmdResult, MemberOverview, MessageLevel, NewBook, NewMember};
use libris::error::Result;
use libris::model::Book;
use libris::store::LibraryStore;

/// Whether the shell keeps running after a handler. `Exit` is reached via
/// the Exit menu item or stdin closing mid-prompt.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Unwraps a prompted value, bailing out of the shell once stdin is closed.
macro_rules! require {
    ($prompted:expr) => {
        match $prompted {
            Some(value) => value,
            None => return Ok(Flow::Exit),
        }
    };
}

pub fn run<S: LibraryStore>(api: &mut LibraryApi<S>) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    run_loop(api, &mut input)
}

fn run_loop<S: LibraryStore, R: BufRead>(api: &mut LibraryApi<S>, input: &mut R) -> Result<()> {
    loop {
        println!("\n===== Library Management System =====");
        println!("1. Book Management");
        println!("2. Member Management");
        println!("3. Issue/Return Books");
        println!("4. Exit");
        println!("===================================");

        let choice = match prompt(input, "Enter your choice: ")? {
            Some(choice) => choice,
            None => break,
        };
        let flow = match choice.as_str() {
            "1" => book_menu(api, input)?,
            "2" => member_menu(api, input)?,
            "3" => issue_return_menu(api, input)?,
            "4" => {
                println!("Exiting Library Management System. Goodbye!");
                break;
            }
            _ => {
                println!("{}", "Invalid choice. Please try again.".red());
                Flow::Continue
            }
        };
        if flow == Flow::Exit {
            break;
        }
    }
    Ok(())
}

fn book_menu<S: LibraryStore, R: BufRead>(
    api: &mut LibraryApi<S>,
    input: &mut R,
) -> Result<Flow> {
    loop {
        println!("\n--- Book Management ---");
        println!("1. Add New Book");
        println!("2. View All Books");
        println!("3. Search Book");
        println!("4. Back to Main Menu");

        let choice = require!(prompt(input, "Enter your choice: ")?);
        match choice.as_str() {
            "1" => {
                if add_book(api, input)? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            "2" => {
                println!("\n--- All Books in Library ---");
                show_books(api.list_books());
            }
            "3" => {
                if search_books(api, input)? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            "4" => return Ok(Flow::Continue),
            _ => println!("{}", "Invalid choice. Please try again.".red()),
        }
    }
}

fn add_book<S: LibraryStore, R: BufRead>(api: &mut LibraryApi<S>, input: &mut R) -> Result<Flow> {
    println!("\n--- Add New Book ---");
    let title = require!(prompt_nonempty(input, "Enter book title: ", "Title")?);
    let author = require!(prompt_nonempty(input, "Enter book author: ", "Author")?);
    let isbn = require!(prompt_nonempty(
        input,
        "Enter book ISBN (e.g., 978-0321765723): ",
        "ISBN"
    )?);
    let quantity = require!(prompt_positive_number(input, "Enter total quantity: ")?);

    report(api.add_book(NewBook {
        title,
        author,
        isbn,
        quantity,
    }));
    Ok(Flow::Continue)
}

fn search_books<S: LibraryStore, R: BufRead>(
    api: &mut LibraryApi<S>,
    input: &mut R,
) -> Result<Flow> {
    println!("\n--- Search Book ---");
    let term = require!(prompt(input, "Enter title, author, or ISBN to search: ")?);
    show_books(api.search_books(&term));
    Ok(Flow::Continue)
}

fn member_menu<S: LibraryStore, R: BufRead>(
    api: &mut LibraryApi<S>,
    input: &mut R,
) -> Result<Flow> {
    loop {
        println!("\n--- Member Management ---");
        println!("1. Add New Member");
        println!("2. View All Members");
        println!("3. Back to Main Menu");

        let choice = require!(prompt(input, "Enter your choice: ")?);
        match choice.as_str() {
            "1" => {
                if add_member(api, input)? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            "2" => {
                println!("\n--- All Members ---");
                show_members(api.list_members());
            }
            "3" => return Ok(Flow::Continue),
            _ => println!("{}", "Invalid choice. Please try again.".red()),
        }
    }
}

fn add_member<S: LibraryStore, R: BufRead>(
    api: &mut LibraryApi<S>,
    input: &mut R,
) -> Result<Flow> {
    println!("\n--- Add New Member ---");
    let is_student = require!(prompt_member_type(input)?);
    let name = require!(prompt_nonempty(input, "Enter member name: ", "Name")?);

    let new = if is_student {
        let student_id = require!(prompt_nonempty(input, "Enter student ID: ", "Student ID")?);
        NewMember::Student { name, student_id }
    } else {
        let department = require!(prompt_nonempty(input, "Enter department: ", "Department")?);
        NewMember::Faculty { name, department }
    };

    report(api.add_member(new));
    Ok(Flow::Continue)
}

fn issue_return_menu<S: LibraryStore, R: BufRead>(
    api: &mut LibraryApi<S>,
    input: &mut R,
) -> Result<Flow> {
    loop {
        println!("\n--- Issue/Return Books ---");
        println!("1. Issue Book");
        println!("2. Return Book");
        println!("3. Back to Main Menu");

        let choice = require!(prompt(input, "Enter your choice: ")?);
        match choice.as_str() {
            "1" => {
                if issue_book(api, input)? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            "2" => {
                if return_book(api, input)? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            "3" => return Ok(Flow::Continue),
            _ => println!("{}", "Invalid choice. Please try again.".red()),
        }
    }
}

fn issue_book<S: LibraryStore, R: BufRead>(
    api: &mut LibraryApi<S>,
    input: &mut R,
) -> Result<Flow> {
    println!("\n--- Issue Book ---");
    let member_id = require!(prompt_positive_number(input, "Enter Member ID: ")?);
    let isbn = require!(prompt_nonempty(
        input,
        "Enter ISBN of the book to issue: ",
        "ISBN"
    )?);
    report(api.issue_book(member_id, &isbn));
    Ok(Flow::Continue)
}

fn return_book<S: LibraryStore, R: BufRead>(
    api: &mut LibraryApi<S>,
    input: &mut R,
) -> Result<Flow> {
    println!("\n--- Return Book ---");
    let member_id = require!(prompt_positive_number(input, "Enter Member ID: ")?);

    // Show what the member actually holds before asking which ISBN comes
    // back.
    let loans = match api.member_loans(member_id) {
        Ok(result) => result,
        Err(err) => {
            println!("{}", err.to_string().red());
            return Ok(Flow::Continue);
        }
    };
    let has_loans = loans
        .members
        .first()
        .map_or(false, |overview| !overview.borrowed.is_empty());
    if !has_loans {
        println!("No books are currently issued to this member.");
        return Ok(Flow::Continue);
    }
    print_members(&loans.members);

    let isbn = require!(prompt_nonempty(
        input,
        "Enter ISBN of the book to return: ",
        "ISBN"
    )?);
    report(api.return_book(member_id, &isbn));
    Ok(Flow::Continue)
}

/// Prompts for one line. Returns the trimmed line, or None once stdin is
/// closed.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Re-prompts until the line is non-empty.
fn prompt_nonempty<R: BufRead>(
    input: &mut R,
    label: &str,
    field: &str,
) -> Result<Option<String>> {
    loop {
        let line = match prompt(input, label)? {
            Some(line) => line,
            None => return Ok(None),
        };
        if !line.is_empty() {
            return Ok(Some(line));
        }
        println!(
            "{}",
            format!("{} cannot be empty. Please try again.", field).red()
        );
    }
}

/// Re-prompts until the line parses as a positive integer.
fn prompt_positive_number<R: BufRead>(input: &mut R, label: &str) -> Result<Option<u32>> {
    loop {
        let line = match prompt(input, label)? {
            Some(line) => line,
            None => return Ok(None),
        };
        match line.parse::<u32>() {
            Ok(number) if number > 0 => return Ok(Some(number)),
            _ => println!(
                "{}",
                "Invalid input. Please enter a positive number.".red()
            ),
        }
    }
}

/// Re-prompts until the line names a member type. True means student.
fn prompt_member_type<R: BufRead>(input: &mut R) -> Result<Option<bool>> {
    loop {
        let line = match prompt(input, "Enter member type (Student/Faculty): ")? {
            Some(line) => line,
            None => return Ok(None),
        };
        match line.to_lowercase().as_str() {
            "student" => return Ok(Some(true)),
            "faculty" => return Ok(Some(false)),
            _ => println!(
                "{}",
                "Invalid member type. Please enter 'Student' or 'Faculty'.".red()
            ),
        }
    }
}

/// Prints a mutation outcome: its messages on success, the error in red
/// otherwise. Errors are reported and the shell returns to its menu.
fn report(outcome: Result<CmdResult>) {
    match outcome {
        Ok(result) => print_messages(&result.messages),
        Err(err) => println!("{}", err.to_string().red()),
    }
}

fn show_books(outcome: Result<CmdResult>) {
    match outcome {
        Ok(result) => {
            print_books(&result.books);
            print_messages(&result.messages);
        }
        Err(err) => println!("{}", err.to_string().red()),
    }
}

fn show_members(outcome: Result<CmdResult>) {
    match outcome {
        Ok(result) => {
            print_members(&result.members);
            print_messages(&result.messages);
        }
        Err(err) => println!("{}", err.to_string().red()),
    }
}

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_books(books: &[Book]) {
    for book in books {
        println!("{}", book);
    }
    if !books.is_empty() {
        println!("{}", "-".repeat(30));
    }
}

fn print_members(members: &[MemberOverview]) {
    for overview in members {
        println!("{}", overview.member);
        if overview.borrowed.is_empty() {
            println!("  No books currently borrowed.");
        } else {
            println!("  Borrowed Books:");
            for (position, loan) in overview.borrowed.iter().enumerate() {
                match &loan.book {
                    Some(book) => println!(
                        "    {}. {} by {} (ISBN: {})",
                        position + 1,
                        book.title(),
                        book.author(),
                        loan.isbn
                    ),
                    None => println!(
                        "    {}. Unknown Book (ISBN: {}) - data might be missing.",
                        position + 1,
                        loan.isbn
                    ),
                }
            }
        }
        println!("{}", "-".repeat(30));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris::store::memory::InMemoryStore;
    use std::io::Cursor;

    fn run_session(script: &str) -> LibraryApi<InMemoryStore> {
        let (mut api, _) = LibraryApi::open(InMemoryStore::new());
        let mut input = Cursor::new(script.to_string());
        run_loop(&mut api, &mut input).unwrap();
        api
    }

    #[test]
    fn scripted_session_adds_and_issues_a_book() {
        let script = "1\n1\nDune\nFrank Herbert\n978-1\n2\n4\n\
                      2\n1\nStudent\nAlice\nS1\n3\n\
                      3\n1\n1001\n978-1\n3\n4\n";
        let api = run_session(script);

        assert_eq!(api.library().books().len(), 1);
        assert_eq!(api.library().book("978-1").unwrap().available_quantity(), 1);
        assert_eq!(
            api.library().loans_of(1001).unwrap(),
            ["978-1".to_string()]
        );
    }

    #[test]
    fn invalid_input_is_retried_not_fatal() {
        // Bad menu choice, empty title, non-numeric quantity: each one is
        // re-prompted and the session still lands the book.
        let script = "9\n1\n1\n\nDune\nFrank Herbert\n978-1\nmany\n2\n4\n4\n";
        let api = run_session(script);
        assert_eq!(api.library().books().len(), 1);
    }

    #[test]
    fn closed_stdin_exits_cleanly_from_any_prompt() {
        // EOF in the middle of the add-book flow.
        let api = run_session("1\n1\nDune\n");
        assert!(api.library().books().is_empty());

        // EOF at the main menu.
        run_session("");
    }
}
