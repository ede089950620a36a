// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transport controls.
//!
//! Play/pause, seek slider, elapsed time, fullscreen, playback rate and
//! mute. Values shown come from the adapter's last progress sample.

use crate::playback::adapter::{format_time, PlaybackAdapter, PLAYBACK_RATES};
use crate::playback::media::MediaElement;

/// Result of transport control interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlsAction {
    None,
    PlayPause,
    /// Seek to a fraction of the duration.
    SeekFraction(f64),
    SetRate(f64),
    ToggleMute,
    ToggleFullscreen,
}

/// Display the transport bar.
pub fn show<M: MediaElement>(
    ui: &mut egui::Ui,
    playback: &PlaybackAdapter<M>,
    show_duration: bool,
) -> ControlsAction {
    let mut action = ControlsAction::None;
    let progress = playback.progress();

    ui.horizontal(|ui| {
        let play_label = if playback.is_playing() { "⏸" } else { "▶" };
        if ui
            .button(play_label)
            .on_hover_text("Play / pause")
            .clicked()
        {
            action = ControlsAction::PlayPause;
        }

        let mut played = progress.played;
        let slider_width = (ui.available_width() - 330.0).max(80.0);
        ui.spacing_mut().slider_width = slider_width;
        let slider = ui.add_enabled(
            progress.duration.is_some(),
            egui::Slider::new(&mut played, 0.0..=1.0).show_value(false),
        );
        if slider.changed() {
            action = ControlsAction::SeekFraction(played);
        }

        ui.label(time_text(progress.current_time, progress.duration, show_duration));

        let fullscreen_label = if playback.is_fullscreen() { "🗗" } else { "⛶" };
        if ui
            .button(fullscreen_label)
            .on_hover_text("Toggle fullscreen")
            .clicked()
        {
            action = ControlsAction::ToggleFullscreen;
        }

        egui::ComboBox::from_id_source("playback_rate")
            .width(60.0)
            .selected_text(format!("{}x", playback.rate()))
            .show_ui(ui, |ui| {
                for rate in PLAYBACK_RATES {
                    if ui
                        .selectable_label(playback.rate() == rate, format!("{}x", rate))
                        .clicked()
                    {
                        action = ControlsAction::SetRate(rate);
                    }
                }
            });

        let mute_label = if playback.is_muted() { "🔇" } else { "🔊" };
        if ui.button(mute_label).on_hover_text("Mute").clicked() {
            action = ControlsAction::ToggleMute;
        }
    });

    action
}

/// Elapsed time, optionally followed by the duration once it is known.
pub fn time_text(current: f64, duration: Option<f64>, show_duration: bool) -> String {
    match duration {
        Some(duration) if show_duration => {
            format!("{} / {}", format_time(current), format_time(duration))
        }
        _ => format_time(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_text() {
        assert_eq!(time_text(65.0, Some(120.0), true), "1:05 / 2:00");
        assert_eq!(time_text(65.0, Some(120.0), false), "1:05");
        assert_eq!(time_text(3.0, None, true), "0:03");
    }
}
