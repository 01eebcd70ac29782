use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

use faqueue_core::{
    Rating, SubmissionClient, SubmissionInfo, UpdateRequest, UploadFile, UploadRequest,
};

use crate::cli::UploadArgs;
use crate::context::AppContext;

pub async fn upload(ctx: &AppContext, args: UploadArgs) -> Result<()> {
    let client = ctx.client()?;
    let file = UploadFile::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {:?}", args.file))?;
    let request = UploadRequest {
        title: args.title,
        description: args.description,
        keywords: args.keywords,
        rating: args.rating,
        submission_type: args.submission_type,
        lock_comments: args.lock_comments,
        scrap: args.scrap,
        create_folder_name: args.create_folder_name,
    };

    let url = client.upload(&file, &request).await?;
    println!("Submission uploaded!  {}", url);
    Ok(())
}

/// The editable part of a submission, as presented in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EditFile {
    title: String,
    description: String,
    #[serde(default)]
    keywords: String,
    rating: Rating,
    #[serde(default)]
    scrap: bool,
    #[serde(default)]
    lock_comments: bool,
}

impl From<SubmissionInfo> for EditFile {
    fn from(info: SubmissionInfo) -> Self {
        Self {
            title: info.title,
            description: info.description,
            keywords: info.keywords,
            rating: info.rating,
            scrap: info.scrap,
            lock_comments: info.lock_comments,
        }
    }
}

impl EditFile {
    fn render(&self, id: &str) -> Result<String> {
        let body = toml::to_string_pretty(self).context("Failed to render submission info")?;
        Ok(format!(
            "# Submission info for {}\n# rating is one of: general, mature, adult\n\n{}",
            id, body
        ))
    }

    fn into_request(self, id: &str) -> UpdateRequest {
        UpdateRequest {
            id: id.to_string(),
            title: self.title,
            description: self.description,
            keywords: self.keywords,
            rating: self.rating,
            lock_comments: self.lock_comments,
            scrap: self.scrap,
        }
    }
}

pub async fn edit(ctx: &AppContext, id: &str) -> Result<()> {
    let client = ctx.client()?;
    let editor = ctx.editor();
    let info = client
        .submission_info(id)
        .await
        .with_context(|| format!("Failed to read submission {}", id))?;

    let mut file = tempfile::Builder::new()
        .prefix(&format!("faqueue_edit_{}_", id))
        .suffix(".toml")
        .tempfile()
        .context("Failed to create temporary file")?;
    file.write_all(EditFile::from(info).render(id)?.as_bytes())
        .context("Failed to write temporary file")?;
    file.flush().context("Failed to write temporary file")?;

    editor.open(file.path(), true)?;

    let content = std::fs::read_to_string(file.path()).context("Failed to read edited file")?;
    let edited: EditFile = toml::from_str(&content).context("Failed to parse edited file")?;

    let url = client.update(&edited.into_request(id)).await?;
    println!("Submission updated!  {}", url);
    Ok(())
}
