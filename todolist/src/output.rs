use crate::model::Task;

fn format_task_line(task: &Task) -> String {
    format!("ID: {} | Title: {} | Status: {}", task.id, task.title, task.status)
}

pub fn format_task_list(tasks: &[Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&format_task_line(task));
        out.push('\n');
    }
    out
}
