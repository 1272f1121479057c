use chrono::{Local, TimeZone};
use eframe::egui;

use crate::common::Message;
use crate::ui::attachment::payload_size;

const BUBBLE_MAX_WIDTH: f32 = 320.0;

#[derive(Default)]
pub struct ChatAreaActions {
    pub load_older: bool,
    /// Text the user asked to copy to the clipboard.
    pub copy: Option<String>,
}

/// `HH:MM` in local time.
pub fn format_time(timestamp: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_default()
}

pub fn render(
    ui: &mut egui::Ui,
    messages: &[Message],
    has_more: bool,
    loading_older: bool,
    ai_typing: bool,
) -> ChatAreaActions {
    let mut actions = ChatAreaActions::default();

    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .max_height(400.0)
        .show(ui, |ui| {
            if loading_older {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading older messages...");
                });
            } else if has_more && ui.button("Load older messages").clicked() {
                actions.load_older = true;
            }

            if messages.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("No messages yet. Say hello!").weak());
                });
            }

            for message in messages {
                render_message(ui, message, &mut actions);
            }

            if ai_typing {
                ui.label(egui::RichText::new("Gemini is typing...").italics().weak());
            }
        });

    actions
}

fn render_message(ui: &mut egui::Ui, message: &Message, actions: &mut ChatAreaActions) {
    // Tin của người dùng căn phải, của AI căn trái
    let layout = if message.sender.is_user() {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_max_width(BUBBLE_MAX_WIDTH);
            ui.vertical(|ui| {
                if !message.content.is_empty() {
                    ui.label(message.content.as_str());
                }
                if let Some(image) = &message.image {
                    let kb = payload_size(image).unwrap_or_default().div_ceil(1024);
                    ui.label(egui::RichText::new(format!("[image, {kb} KB]")).italics());
                }
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format_time(message.timestamp))
                            .small()
                            .weak(),
                    );
                    if ui.small_button("Copy").clicked() {
                        actions.copy = Some(message.content.clone());
                    }
                });
            });
        });
    });
}
