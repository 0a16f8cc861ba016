// SPDX-License-Identifier: MPL-2.0
//! `frame_capture` is the core of a video screenshot and GIF tool.
//!
//! It samples frames from an asynchronously seeking media element at exact
//! timestamps, lets each captured frame be annotated, cropped and tone
//! adjusted, and assembles chosen frames (or a sampled time range) into an
//! animated GIF.
//!
//! The host UI talks to a [`capture::CaptureSession`]; everything below it is
//! usable on its own.

#![doc(html_root_url = "https://docs.rs/frame_capture/0.1.0")]

pub mod animation;
pub mod application;
pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod image_editor;
pub mod media;
pub mod video_player;

#[cfg(test)]
mod test_utils;
