//! Terminal front end for the product photo studio.
//!
//! Collects input images from the command line or the batch prompt, feeds
//! them to the pipeline, renders the tracker state as it changes, and
//! writes every edited image into the output directory.

pub mod cli;
pub mod download;
pub mod input;
pub mod render;
pub mod session;
