use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use faqueue_core::{QueueStore, UploadRunner};

use crate::cli::QueueCommand;
use crate::context::AppContext;
use crate::table::Table;

pub async fn run(ctx: &AppContext, command: QueueCommand) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let open = || -> Result<QueueStore> {
        let mut store = QueueStore::new(&cwd, ctx.editor());
        store.reload()?;
        Ok(store)
    };

    match command {
        QueueCommand::Init { dir } => {
            let dir = dir.map(|d| cwd.join(d)).unwrap_or_else(|| cwd.clone());
            init(ctx, dir)?;
        }
        QueueCommand::Add { files } => {
            for file in open()?.add(&files)? {
                println!("added {:?}", file);
            }
        }
        QueueCommand::Remove { files } => {
            for file in open()?.remove(&files)? {
                println!("removed {:?}", file);
            }
        }
        QueueCommand::Clean => {
            let cleaned = open()?.clean()?;
            println!("Removed {} uploaded files", cleaned.len());
        }
        QueueCommand::Reorder => {
            let mut store = open()?;
            if !store.queue().is_empty() {
                store.reorder()?;
            }
            print!("{}", render_status(&store));
        }
        QueueCommand::Status => print!("{}", render_status(&open()?)),
        QueueCommand::Upload { wait_time } => {
            let mut store = open()?;
            let client = ctx.client()?;
            let summary = UploadRunner::new(client).run(&mut store, wait_time).await?;
            info!(
                "Uploaded {} submissions, skipped {}",
                summary.uploaded.len(),
                summary.skipped.len()
            );
            println!("Submissions uploaded.");
        }
    }
    Ok(())
}

fn init(ctx: &AppContext, dir: PathBuf) -> Result<()> {
    let mut store = QueueStore::new(dir, ctx.editor());
    let dir = store.init()?;
    println!("Created new queue dir in {:?}", dir);
    Ok(())
}

fn render_status(store: &QueueStore) -> String {
    let mut out = String::new();

    if store.queue().is_empty() {
        out.push_str(
            "Nothing is in the queue yet, use `faqueue queue add ...` to add files.\n",
        );
    } else {
        let mut table = Table::new(["Position", "File name", "Title", "Rating"]);
        for (idx, file) in store.queue().iter().enumerate() {
            let (title, rating) = match store.metadata().get(file) {
                Some(info) => (info.title.clone(), info.rating.to_string()),
                None => ("(no info file)".to_string(), "-".to_string()),
            };
            table.row([(idx + 1).to_string(), file.clone(), title, rating]);
        }
        out.push_str("Enqueued files:\n");
        out.push_str(&table.render());
        out.push('\n');
    }

    let uploaded = store.uploaded_files();
    if !uploaded.is_empty() {
        let mut table = Table::new(["File name", "Title", "Submission URL"]);
        for (file, status) in &uploaded {
            let title = store
                .metadata()
                .get(file)
                .map(|info| info.title.clone())
                .unwrap_or_default();
            table.row([
                file.clone(),
                title,
                status.url().unwrap_or_default().to_string(),
            ]);
        }
        out.push_str(
            "\nUploaded files (will be removed when you run `faqueue queue clean`):\n",
        );
        out.push_str(&table.render());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqueue_core::Editor;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, QueueStore) {
        let dir = TempDir::new().unwrap();
        let mut store = QueueStore::new(dir.path(), Editor::disabled());
        store.init().unwrap();
        let mut names = Vec::new();
        for (name, title) in files {
            fs::write(dir.path().join(name), b"x").unwrap();
            fs::write(
                dir.path().join(format!("{}.info.toml", name)),
                format!("title = \"{}\"\nrating = \"adult\"\n", title),
            )
            .unwrap();
            names.push(name.to_string());
        }
        store.reload().unwrap();
        store.add(&names).unwrap();
        (dir, store)
    }

    #[test]
    fn test_status_of_empty_queue() {
        let (_dir, store) = store_with(&[]);
        let status = render_status(&store);
        assert!(status.starts_with("Nothing is in the queue yet"));
        assert!(!status.contains("Uploaded files"));
    }

    #[test]
    fn test_status_lists_queue_and_uploads() {
        let (_dir, mut store) = store_with(&[("a.png", "First"), ("b.png", "Second")]);
        store
            .record_upload("a.png", "https://www.furaffinity.net/view/7/")
            .unwrap();

        let status = render_status(&store);
        assert!(status.contains("| 1        | b.png     | Second | adult  |"));
        assert!(status.contains("| a.png     | First | https://www.furaffinity.net/view/7/ |"));
    }
}
