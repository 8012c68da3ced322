use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::{CommentDetail, Project, ProjectDetail};
use crate::present::{self, ProjectStatus, EXCERPT_CHARS, TAG_PREVIEW};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    status: Option<u16>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = status {
                response["status"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_of(project: &Project) -> ProjectStatus {
    ProjectStatus::classify(project.published, project.abandoned_at)
}

/// `rust, wasm, ecs +2`
pub fn tag_line(tags: &[String]) -> String {
    let (shown, hidden) = present::tag_preview(tags, TAG_PREVIEW);
    let mut line = shown.join(", ");
    if hidden > 0 {
        line.push_str(&format!(" +{}", hidden));
    }
    line
}

/// One block per project, as in the list view.
pub fn project_summary(detail: &ProjectDetail) -> String {
    let project = &detail.project;
    let mut out = format!(
        "[{}] {}\n  {}\n  by {} on {} · {} comment(s)",
        status_of(project),
        project.title,
        project.id,
        present::display_name(&detail.author),
        present::format_date(project.created_at),
        detail.comments.len(),
    );
    if !project.tags.is_empty() {
        out.push_str(&format!("\n  tags: {}", tag_line(&project.tags)));
    }
    out.push_str(&format!("\n  {}", present::excerpt(&project.content, EXCERPT_CHARS)));
    out
}

pub fn comment_line(comment: &CommentDetail) -> String {
    format!(
        "{} · {} ({})\n  {}",
        present::display_name(&comment.author),
        present::format_date(comment.comment.created_at),
        comment.comment.id,
        comment.comment.content,
    )
}

/// Full project view with every tag and every comment.
pub fn project_full(detail: &ProjectDetail) -> String {
    let project = &detail.project;
    let mut out = format!(
        "{}\n[{}] by {} on {}",
        project.title,
        status_of(project),
        present::display_name(&detail.author),
        present::format_date(project.created_at),
    );
    if let Some(abandoned_at) = project.abandoned_at {
        out.push_str(&format!(" · abandoned {}", present::format_date(abandoned_at)));
    }
    if !project.tags.is_empty() {
        out.push_str(&format!("\ntags: {}", project.tags.join(", ")));
    }
    out.push_str(&format!("\n\n{}\n", project.content));
    out.push_str(&format!("\nComments ({})", detail.comments.len()));
    for comment in &detail.comments {
        out.push_str(&format!("\n- {}", comment_line(comment)));
    }
    out
}

/// Short confirmation line for a project the user just wrote.
pub fn project_saved(project: &Project) -> String {
    format!("{} [{}] ({})", project.title, status_of(project), project.id)
}
