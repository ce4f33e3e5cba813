// UI layer: collects the caption and token with `dialoguer`, shows a
// decorative progress bar with `indicatif`, and drives one save run.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::source::{caption_image_url, fetch_image, source_base_from_env};
use crate::storage::{FolderCreated, StorageClient, UploadAccepted};

/// Remote folder every image goes into.
pub const FOLDER: &str = "SPD-132";

/// How a run ended. Every variant is reported to the user; none of them
/// changes the exit code.
#[derive(Debug)]
pub enum RunOutcome {
    Uploaded(UploadAccepted),
    FolderFailed(StorageError),
    UploadFailed(StorageError),
}

/// `SPD-132/{caption}.jpg`, with `/` in the caption flattened so it stays
/// inside the folder.
pub fn destination_for(caption: &str) -> String {
    format!("{FOLDER}/{}.jpg", caption.replace('/', "_"))
}

/// Make sure the folder exists, then upload `image_url` under the caption.
/// `before_upload` runs between the two steps.
pub fn save_to_disk(
    storage: &StorageClient,
    image_url: &str,
    caption: &str,
    before_upload: impl FnOnce(),
) -> RunOutcome {
    match storage.create_folder(FOLDER) {
        Ok(FolderCreated::Created) => println!("Folder {FOLDER} created"),
        Ok(FolderCreated::AlreadyExists) => println!("Folder {FOLDER} already exists"),
        Err(e) => return RunOutcome::FolderFailed(e),
    }

    before_upload();

    match storage.upload_from_url(&destination_for(caption), image_url) {
        Ok(accepted) => RunOutcome::Uploaded(accepted),
        Err(e) => RunOutcome::UploadFailed(e),
    }
}

pub fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Uploaded(accepted) => {
            println!("File queued for upload to {}", accepted.destination);
        }
        RunOutcome::FolderFailed(e) => {
            println!("Error creating folder: {e}");
            println!("Could not create folder");
        }
        RunOutcome::UploadFailed(e) if e.is_connection() => {
            println!("Connection error: {e}");
            println!("Could not upload file");
        }
        RunOutcome::UploadFailed(e) => {
            println!("Upload error: {e}");
            println!("Could not upload file");
        }
    }
}

/// Interactive entry point: prompt, render, check the image, save it.
pub fn run() -> Result<()> {
    println!("Saving a captioned image to cloud storage");

    let caption: String = Input::new()
        .with_prompt("Enter your text")
        .validate_with(|s: &String| {
            if s.trim().is_empty() {
                Err("text must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    let caption = caption.trim().to_string();
    // `Password` keeps the token off the screen.
    let token: String = Password::new().with_prompt("Storage OAuth token").interact()?;
    let token = token.trim().to_string();

    println!("Generating image with text");
    let http = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let image_url = match caption_image_url(&source_base_from_env(), &caption) {
        Ok(url) => url,
        Err(e) => {
            println!("Error: cannot build image URL: {e}");
            return Ok(());
        }
    };
    if let Err(e) = fetch_image(&http, &image_url) {
        println!("Error: cannot get image: {e}");
        return Ok(());
    }

    let storage = match StorageClient::new(StorageConfig::from_env(token)) {
        Ok(storage) => storage,
        Err(e) => {
            println!("Error: {e}");
            return Ok(());
        }
    };

    let outcome = save_to_disk(&storage, image_url.as_str(), &caption, simulate_progress);
    report(&outcome);
    Ok(())
}

/// Purely visual: ten fixed steps while the upload is prepared.
fn simulate_progress() {
    let bar = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::with_template("Upload progress {bar:40} {pos}%") {
        bar.set_style(style);
    }
    for _ in 0..10 {
        thread::sleep(Duration::from_millis(300));
        bar.inc(10);
    }
    bar.finish();
}
