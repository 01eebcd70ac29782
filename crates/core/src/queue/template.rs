//! Sidecar template written by `init` and rendered by `add`.

/// Placeholder replaced with the queued file's name.
pub const FILE_NAME_PLACEHOLDER: &str = "{file_name}";

/// Template for new sidecars. Kept in the queue directory so operators can
/// change the defaults per queue.
pub const SUBMISSION_TEMPLATE: &str = r#"# Submission info for {file_name}

# Required
title = ""

# Required
description = """
Your description goes here"""

# Optional, keywords separated by spaces
keywords = ""

# Required, one of: general, mature, adult
rating = "general"

# One of: submission, story, poetry, music
type = "submission"

scrap = false
lock_comments = false

# Create a new folder to place this submission under, leave blank if none
# should be created.
create_folder_name = ""

# Actions to run after this file was uploaded. Every submission a hook
# changes is updated on the site once all of its actions ran.
#
# [[after_upload]]
# action = "append_text"
# text = "Thanks for looking!"
#
# Link this submission and a previously uploaded one to each other:
#
# [[after_upload]]
# action = "cross_link"
# with = "previous_file.png"
# text = "Alt version 2"
# back_text = "Alt version 1"
#
# Other actions: "append_link" (target, to or url, text) and "set" (target,
# title, description, keywords, rating, scrap, lock_comments). `target`
# defaults to this file.
"#;

/// Render a sidecar body for `file_name` from `template`.
pub fn render(template: &str, file_name: &str) -> String {
    template.replace(FILE_NAME_PLACEHOLDER, &format!("{:?}", file_name))
}
