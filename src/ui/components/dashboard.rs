use eframe::egui;

use crate::common::Chatroom;
use crate::ui::state::DashboardForm;
use crate::validation::TITLE_MAX_LEN;

#[derive(Default)]
pub struct DashboardActions {
    pub create: bool,
    pub delete: Option<String>,
    pub open: Option<String>,
}

pub fn render(ui: &mut egui::Ui, form: &mut DashboardForm, chatrooms: &[&Chatroom]) -> DashboardActions {
    let mut actions = DashboardActions::default();

    ui.vertical_centered(|ui| {
        ui.heading("Your Chatrooms");
    });
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut form.title)
                .hint_text("New chatroom title")
                .char_limit(TITLE_MAX_LEN),
        );
        if ui.button("Create").clicked() {
            actions.create = true;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.create = true;
        }
    });
    if let Some(error) = &form.error {
        ui.colored_label(egui::Color32::RED, error.as_str());
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.add(egui::TextEdit::singleline(&mut form.search).hint_text("Filter by title"));
    });
    ui.separator();

    if chatrooms.is_empty() {
        ui.vertical_centered(|ui| {
            let text = if form.search.trim().is_empty() {
                "No chatrooms yet."
            } else {
                "No chatrooms match your search."
            };
            ui.label(egui::RichText::new(text).weak());
        });
        return actions;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for room in chatrooms {
            ui.horizontal(|ui| {
                if ui.link(egui::RichText::new(room.title.as_str()).strong()).clicked() {
                    actions.open = Some(room.id.clone());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(egui::RichText::new("Delete").color(egui::Color32::RED))
                        .clicked()
                    {
                        actions.delete = Some(room.id.clone());
                    }
                });
            });
            ui.separator();
        }
    });

    actions
}
