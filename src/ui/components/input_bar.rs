use eframe::egui;

use crate::validation::MESSAGE_MAX_LEN;

#[derive(Default)]
pub struct InputActions {
    pub send: bool,
    pub attach: bool,
    pub remove_image: bool,
}

pub fn render(
    ui: &mut egui::Ui,
    input_text: &mut String,
    image_path: &mut String,
    has_image: bool,
    enabled: bool,
) -> InputActions {
    let mut actions = InputActions::default();

    ui.horizontal(|ui| {
        if has_image {
            ui.label("Image attached");
            if ui.add_enabled(enabled, egui::Button::new("Remove")).clicked() {
                actions.remove_image = true;
            }
        } else {
            ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(image_path).hint_text("Image file path"),
            );
            let can_attach = enabled && !image_path.trim().is_empty();
            if ui.add_enabled(can_attach, egui::Button::new("Attach")).clicked() {
                actions.attach = true;
            }
        }
    });

    ui.horizontal(|ui| {
        let response = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(input_text)
                .hint_text("Type your message...")
                .char_limit(MESSAGE_MAX_LEN),
        );
        let can_send = enabled && (!input_text.trim().is_empty() || has_image);
        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
            actions.send = true;
        }

        if can_send && response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.send = true;
        }
    });

    actions
}
