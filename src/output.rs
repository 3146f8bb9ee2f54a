use crate::model::{AnalysisReport, ScoredTask, Task};

fn meta_line(
    due_date: Option<chrono::NaiveDate>,
    importance: u8,
    estimated_hours: u32,
    dependencies: &[u64],
) -> String {
    let due = match due_date {
        Some(d) => format!("Due: {d}"),
        None => "No due date".to_string(),
    };
    let deps = if dependencies.is_empty() {
        "Dependencies: none".to_string()
    } else {
        let list: Vec<String> = dependencies.iter().map(|d| d.to_string()).collect();
        format!("Dependencies: [{}]", list.join(", "))
    };
    format!(
        "{due} | Importance: {importance} | Estimated hours: {estimated_hours} | {deps}"
    )
}

/// Numbered task list, one task per pair of lines. Indices are 1-based since
/// they are what `done INDEX` takes.
pub fn format_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks. Add one with 'add' or paste a list with 'import'.\n".to_string();
    }
    let mut out = String::new();
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, task.title));
        out.push_str(&format!(
            "   {}\n",
            meta_line(
                task.due_date,
                task.importance,
                task.estimated_hours,
                &task.dependencies
            )
        ));
    }
    out
}

fn format_card(task: &ScoredTask) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "[{}] {}  (score: {})\n",
        task.priority_label, task.title, task.score
    ));
    out.push_str(&format!(
        "    {}\n",
        meta_line(
            task.due_date,
            task.importance,
            task.estimated_hours,
            &task.dependencies
        )
    ));
    if !task.explanation.is_empty() {
        out.push_str(&format!("    {}\n", task.explanation));
    }
    out
}

/// Analysis report as priority cards, one per scored task.
pub fn format_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Strategy: {}\n\n", report.strategy));
    for task in &report.tasks {
        out.push_str(&format_card(task));
    }
    out
}
