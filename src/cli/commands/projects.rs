use chrono::Utc;
use clap::{Args, Subcommand};
use serde_json::json;
use uuid::Uuid;

use crate::api::{ProjectInput, UpdateProjectInput};
use crate::cli::commands::signed_in_client;
use crate::cli::utils::{output_empty_collection, output_json, output_success, project_full, project_saved, project_summary};
use crate::cli::OutputFormat;
use crate::present;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List every project, newest first")]
    List,

    #[command(about = "Show one project with its comments")]
    Show {
        #[arg(help = "Project id")]
        id: Uuid,
    },

    #[command(about = "Write up a new project")]
    New {
        #[arg(long, help = "Title")]
        title: String,
        #[arg(long, help = "Write-up body")]
        content: String,
        #[arg(long, help = "Comma-separated tags")]
        tags: Option<String>,
        #[arg(long, help = "Publish immediately instead of saving a draft")]
        publish: bool,
    },

    #[command(about = "Change fields of a project you own")]
    Edit(EditArgs),

    #[command(about = "Delete a project you own, with its comments")]
    Delete {
        #[arg(help = "Project id")]
        id: Uuid,
    },
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(help = "Project id")]
    pub id: Uuid,
    #[arg(long, help = "New title")]
    pub title: Option<String>,
    #[arg(long, help = "New write-up body")]
    pub content: Option<String>,
    #[arg(long, help = "Replace tags (comma-separated, empty to clear)")]
    pub tags: Option<String>,
    #[arg(long, conflicts_with = "unpublish", help = "Mark as published")]
    pub publish: bool,
    #[arg(long, help = "Move back to draft")]
    pub unpublish: bool,
    #[arg(long, conflicts_with = "revive", help = "Mark as abandoned now")]
    pub abandon: bool,
    #[arg(long, help = "Clear the abandoned mark")]
    pub revive: bool,
}

impl EditArgs {
    /// Only the flags the user passed end up in the request body.
    pub fn into_update(self) -> (Uuid, UpdateProjectInput) {
        let published = match (self.publish, self.unpublish) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let abandoned_at = match (self.abandon, self.revive) {
            (true, _) => Some(Some(Utc::now())),
            (_, true) => Some(None),
            _ => None,
        };
        let update = UpdateProjectInput {
            title: self.title,
            content: self.content,
            published,
            tags: self.tags.as_deref().map(present::parse_tags),
            abandoned_at,
        };
        (self.id, update)
    }
}

pub async fn handle(cmd: ProjectCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, client) = signed_in_client(server.as_deref())?;

    match cmd {
        ProjectCommands::List => {
            let projects = client.list_projects().await?;
            if projects.is_empty() {
                return output_empty_collection(&output_format, "projects", "No projects yet");
            }
            match output_format {
                OutputFormat::Json => output_json(&projects),
                OutputFormat::Text => {
                    let blocks: Vec<String> = projects.iter().map(project_summary).collect();
                    println!("{}", blocks.join("\n\n"));
                    Ok(())
                }
            }
        }
        ProjectCommands::Show { id } => {
            let project = client.get_project(id).await?;
            match output_format {
                OutputFormat::Json => output_json(&project),
                OutputFormat::Text => {
                    println!("{}", project_full(&project));
                    Ok(())
                }
            }
        }
        ProjectCommands::New { title, content, tags, publish } => {
            let input = ProjectInput {
                title,
                content,
                published: publish,
                tags: tags.as_deref().map(present::parse_tags).unwrap_or_default(),
                abandoned_at: None,
            };
            input.validate()?;

            let project = client.create_project(&input).await?;
            output_success(
                &output_format,
                &format!("Created {}", project_saved(&project)),
                Some(json!({ "project": project })),
            )
        }
        ProjectCommands::Edit(args) => {
            let (id, update) = args.into_update();
            update.validate()?;

            let project = client.update_project(id, &update).await?;
            output_success(
                &output_format,
                &format!("Updated {}", project_saved(&project)),
                Some(json!({ "project": project })),
            )
        }
        ProjectCommands::Delete { id } => {
            let reply = client.delete_project(id).await?;
            output_success(&output_format, &reply.message, Some(json!({ "id": id })))
        }
    }
}
