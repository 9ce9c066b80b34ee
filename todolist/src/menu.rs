//! Interactive menu loop driving a [`TaskStore`] over any line-based I/O pair.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::output::format_task_list;
use crate::store::{StoreError, TaskStore};

/// Whether the loop keeps prompting after an action.
enum Flow {
    Continue,
    EndOfInput,
}

/// Runs the menu until the user picks Exit or the input ends.
pub fn run(
    store: &mut impl TaskStore,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    writeln!(output, "Welcome to the To-Do List Manager!")?;
    loop {
        print_menu(&mut output)?;
        let Some(choice) = read_choice(&mut input, &mut output)? else {
            return Ok(());
        };
        let flow = match choice {
            1 => add_task(store, &mut input, &mut output)?,
            2 => {
                view_tasks(store, &mut output)?;
                Flow::Continue
            }
            3 => update_task(store, &mut input, &mut output)?,
            4 => delete_task(store, &mut input, &mut output)?,
            _ => {
                writeln!(output, "Thank you for using the To-Do List Manager! Goodbye.")?;
                return Ok(());
            }
        };
        if matches!(flow, Flow::EndOfInput) {
            return Ok(());
        }
    }
}

fn print_menu(output: &mut impl Write) -> Result<()> {
    writeln!(output)?;
    writeln!(output, "Please choose an option:")?;
    writeln!(output, "1. Add a new task")?;
    writeln!(output, "2. View all tasks")?;
    writeln!(output, "3. Update task status")?;
    writeln!(output, "4. Delete a task")?;
    writeln!(output, "5. Exit")?;
    writeln!(output)?;
    Ok(())
}

/// One line without its trailing newline, or `None` once the input is done.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

/// Writes `prompt` without a newline and reads the reply.
fn prompt_line(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;
    read_line(input)
}

/// Prompts until a choice in 1..=5 arrives. The menu itself is not
/// re-printed on a bad choice, only the prompt.
fn read_choice(input: &mut impl BufRead, output: &mut impl Write) -> Result<Option<u32>> {
    loop {
        let Some(line) = prompt_line(input, output, "Enter your choice: ")? else {
            return Ok(None);
        };
        match line.trim().parse::<u32>() {
            Ok(choice @ 1..=5) => return Ok(Some(choice)),
            _ => {
                writeln!(output, "Invalid option. Please try again.")?;
                writeln!(output)?;
            }
        }
    }
}

fn add_task(
    store: &mut impl TaskStore,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Flow> {
    let Some(title) = prompt_line(input, output, "Enter task title: ")? else {
        return Ok(Flow::EndOfInput);
    };
    store.create(&title)?;
    writeln!(output, "Task added successfully!")?;
    Ok(Flow::Continue)
}

fn view_tasks(store: &impl TaskStore, output: &mut impl Write) -> Result<()> {
    write!(output, "{}", format_task_list(&store.list()?))?;
    Ok(())
}

fn update_task(
    store: &mut impl TaskStore,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Flow> {
    let Some(line) = prompt_line(input, output, "Enter task ID: ")? else {
        return Ok(Flow::EndOfInput);
    };
    let Ok(id) = line.trim().parse::<i64>() else {
        writeln!(output, "Invalid task ID.")?;
        return Ok(Flow::Continue);
    };
    let Some(status) = prompt_line(input, output, "Enter new status (Pending/Completed): ")? else {
        return Ok(Flow::EndOfInput);
    };
    match store.update_status(id, &status) {
        Ok(_) => writeln!(output, "Task status updated successfully!")?,
        Err(StoreError::NotFound(_)) => writeln!(output, "Task with specified ID not found.")?,
        Err(e) => return Err(e.into()),
    }
    Ok(Flow::Continue)
}

fn delete_task(
    store: &mut impl TaskStore,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Flow> {
    let Some(line) = prompt_line(input, output, "Enter task ID: ")? else {
        return Ok(Flow::EndOfInput);
    };
    let Ok(id) = line.trim().parse::<i64>() else {
        writeln!(output, "Invalid task ID.")?;
        return Ok(Flow::Continue);
    };
    match store.delete(id) {
        Ok(()) => writeln!(output, "Task deleted successfully!")?,
        Err(StoreError::NotFound(_)) => writeln!(output, "Task with specified ID not found.")?,
        Err(e) => return Err(e.into()),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::store::MemoryStore;

    use super::*;

    fn run_session(input: &str) -> String {
        let mut store = MemoryStore::new();
        let mut out = Vec::new();
        run(&mut store, Cursor::new(input.as_bytes()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn exit_prints_full_transcript() {
        let out = run_session("5\n");
        assert_eq!(
            out,
            "Welcome to the To-Do List Manager!\n\
             \n\
             Please choose an option:\n\
             1. Add a new task\n\
             2. View all tasks\n\
             3. Update task status\n\
             4. Delete a task\n\
             5. Exit\n\
             \n\
             Enter your choice: Thank you for using the To-Do List Manager! Goodbye.\n"
        );
    }

    #[test]
    fn add_then_view_shows_the_task() {
        let out = run_session("1\nBuy milk\n2\n5\n");
        assert!(out.contains("Task added successfully!"));
        assert!(out.contains("ID: 1 | Title: Buy milk | Status: Pending\n"));
    }

    #[test]
    fn view_prints_one_line_per_task_in_order() {
        let out = run_session("1\nfirst\n1\nsecond\n2\n5\n");
        assert!(out.contains(
            "ID: 1 | Title: first | Status: Pending\nID: 2 | Title: second | Status: Pending\n"
        ));
    }

    #[test]
    fn view_on_empty_store_prints_no_rows() {
        let out = run_session("2\n5\n");
        assert!(!out.contains("ID:"));
    }

    #[test]
    fn invalid_choices_reprompt_without_reprinting_menu() {
        let out = run_session("9\nabc\n5\n");
        assert_eq!(out.matches("Invalid option. Please try again.").count(), 2);
        assert_eq!(out.matches("Enter your choice: ").count(), 3);
        assert_eq!(out.matches("Please choose an option:").count(), 1);
    }

    #[test]
    fn update_changes_the_listed_status() {
        let out = run_session("1\nBuy milk\n3\n1\nCompleted\n2\n5\n");
        assert!(out.contains("Task status updated successfully!"));
        assert!(out.contains("ID: 1 | Title: Buy milk | Status: Completed\n"));
    }

    #[test]
    fn update_unknown_id_reports_not_found() {
        let out = run_session("3\n42\nCompleted\n5\n");
        assert!(out.contains("Task with specified ID not found."));
    }

    #[test]
    fn non_numeric_id_skips_the_status_prompt() {
        let out = run_session("3\nabc\n5\n");
        assert!(out.contains("Invalid task ID."));
        assert!(!out.contains("Enter new status"));
    }

    #[test]
    fn delete_twice_reports_not_found_the_second_time() {
        let out = run_session("1\na\n4\n1\n4\n1\n5\n");
        assert!(out.contains("Task deleted successfully!"));
        assert!(out.contains("Task with specified ID not found."));
    }

    #[test]
    fn end_of_input_ends_the_session_cleanly() {
        let out = run_session("1\nBuy milk\n");
        assert!(out.contains("Task added successfully!"));
        assert!(!out.contains("Goodbye"));
    }

    #[test]
    fn end_of_input_at_a_prompt_exits_without_reprinting_the_menu() {
        let out = run_session("1\n");
        assert!(out.ends_with("Enter task title: "));
        assert_eq!(out.matches("Please choose an option:").count(), 1);

        let out = run_session("1\nBuy milk\n3\n1\n");
        assert!(out.ends_with("Enter new status (Pending/Completed): "));

        let out = run_session("4\n");
        assert!(out.ends_with("Enter task ID: "));
    }
}
