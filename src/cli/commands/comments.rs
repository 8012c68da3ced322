use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::api::CommentInput;
use crate::cli::commands::signed_in_client;
use crate::cli::utils::{comment_line, output_empty_collection, output_json, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum CommentCommands {
    #[command(about = "List comments on a project, newest first")]
    List {
        #[arg(help = "Project id")]
        project: Uuid,
    },

    #[command(about = "Comment on a project")]
    Add {
        #[arg(help = "Project id")]
        project: Uuid,
        #[arg(help = "Comment text")]
        content: String,
    },

    #[command(about = "Delete one of your comments")]
    Delete {
        #[arg(help = "Comment id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: CommentCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let (session, client) = signed_in_client(server.as_deref())?;

    match cmd {
        CommentCommands::List { project } => {
            let comments = client.list_comments(project).await?;
            if comments.is_empty() {
                return output_empty_collection(&output_format, "comments", "No comments yet");
            }
            match output_format {
                OutputFormat::Json => output_json(&comments),
                OutputFormat::Text => {
                    for comment in &comments {
                        let own = session.user_id == Some(comment.comment.author_id);
                        println!("{}{}", comment_line(comment), if own { "\n  (yours)" } else { "" });
                    }
                    Ok(())
                }
            }
        }
        CommentCommands::Add { project, content } => {
            CommentInput { content: content.clone() }.validate()?;

            let comment = client.create_comment(project, content.trim()).await?;
            output_success(
                &output_format,
                &format!("Comment added ({})", comment.comment.id),
                Some(json!({ "comment": comment })),
            )
        }
        CommentCommands::Delete { id } => {
            let reply = client.delete_comment(id).await?;
            output_success(&output_format, &reply.message, Some(json!({ "id": id })))
        }
    }
}
