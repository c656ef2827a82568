//! Text rendering of the photo list.
//!
//! Layout:
//!
//! ```text
//! Photos (2, 1 waiting for image)        [tracking]
//! #2  (11.000000, 11.000000)  loading…
//! #1  (10.000000, 10.000000)  http://img/1
//! stop: Ctrl-C
//! ```

use crate::ui::viewmodel::{PhotoListViewModel, PhotoRow};
use std::fmt::Write;

/// Renders `viewmodel` as a block of lines ending in a newline.
#[must_use]
pub fn render(viewmodel: &PhotoListViewModel) -> String {
    let mut out = String::new();
    render_header(&mut out, viewmodel);

    match &viewmodel.empty_state {
        Some(empty) => {
            let _ = writeln!(out, "  {}", empty.message);
            let _ = writeln!(out, "  {}", empty.subtitle);
        }
        None => viewmodel.rows.iter().for_each(|row| render_row(&mut out, row)),
    }

    render_footer(&mut out, viewmodel);
    out
}

fn render_header(out: &mut String, viewmodel: &PhotoListViewModel) {
    let status = if viewmodel.controls.can_stop { "tracking" } else { "idle" };
    let _ = match viewmodel.pending_images {
        0 => writeln!(out, "Photos ({})  [{status}]", viewmodel.rows.len()),
        pending => writeln!(
            out,
            "Photos ({}, {pending} waiting for image)  [{status}]",
            viewmodel.rows.len()
        ),
    };
}

fn render_row(out: &mut String, row: &PhotoRow) {
    let image = row.image_url.as_deref().unwrap_or("loading…");
    let _ = writeln!(out, "#{:<4}{}  {image}", row.id, row.location);
}

fn render_footer(out: &mut String, viewmodel: &PhotoListViewModel) {
    if viewmodel.controls.can_stop {
        out.push_str("stop: Ctrl-C\n");
    } else {
        out.push_str("start: run with --fixes <file>\n");
    }
}
