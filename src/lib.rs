//! # cam-site
//!
//! Turns the dated upload tree of a set of security cameras into a static
//! site you can browse from any file server.
//!
//! # Architecture: Two Independent Phases
//!
//! ```text
//! 1. Collect   <root>/<camera>/YYYY/MM/DD/  →  images/ + thumbnails/   (one day)
//! 2. Build     images/ + thumbnails/        →  index.html + galleries  (HTML only)
//! ```
//!
//! The phases share nothing but the web root. The builder never looks at
//! the upload tree, so it can run on a different schedule (or machine) and
//! always renders what was collected, not what was uploaded. Both phases
//! take their settings as an explicit [`config::SiteConfig`] value.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `<camera>_<seq>_<YYYYMMDDHHMMSS>.<ext>` capture filename parser |
//! | [`layout`] | Pure path functions for the upload tree and the web root |
//! | [`media`] | Media items, still/video pairing, chronological ordering |
//! | [`collect`] | Phase 1: thumbnails plus symlinks to the originals |
//! | [`scan`] | Reads the web root back for the builder |
//! | [`generate`] | Phase 2: index, gallery pages and calendar archive, rendered with Maud |
//! | [`imaging`] | Thumbnail backend trait, dimension math, `image` crate backend, ffmpeg frames |
//! | [`config`] | `config.toml` loading, stock defaults, validation |
//! | [`output`] | CLI summary formatting for both phases |
//! | [`logging`] | tracing subscriber setup |
//!
//! # Design Decisions
//!
//! ## Symlinks, Not Copies
//!
//! Camera uploads are large and already on the same disk. The web root links
//! to them by absolute path, so collecting a day costs one thumbnail per file
//! and no extra storage for the originals.
//!
//! ## Everything Is Rewritten
//!
//! Reruns overwrite thumbnails, replace links and regenerate pages. There is
//! no state besides the output tree itself, which makes both phases safe to
//! run again after a partial failure.
//!
//! ## Video Previews
//!
//! Cameras typically shoot a still just before a clip. By default the clip's
//! preview is the thumbnail of that still; `[video] thumbnail = "frame"` asks
//! an external `ffmpeg` instead, and either falls back to a generated
//! placeholder tile when it can't.

pub mod collect;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod layout;
pub mod logging;
pub mod media;
pub mod naming;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
