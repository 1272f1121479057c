use eframe::egui;

use crate::ui::state::OtpForm;
use crate::validation::OTP_LEN;

/// Returns `true` when the code was submitted.
pub fn render(ui: &mut egui::Ui, form: &mut OtpForm, destination: &str, verifying: bool) -> bool {
    ui.vertical_centered(|ui| {
        ui.heading("Enter OTP");
        ui.label(
            egui::RichText::new(format!("Enter the 6-digit OTP sent to {destination}")).weak(),
        );
    });
    ui.add_space(12.0);

    ui.label("OTP");
    let response = ui.add(
        egui::TextEdit::singleline(&mut form.code)
            .hint_text("Enter OTP")
            .char_limit(OTP_LEN)
            .font(egui::TextStyle::Monospace),
    );

    if let Some(error) = &form.error {
        ui.colored_label(egui::Color32::RED, error.as_str());
    }

    ui.add_space(8.0);
    let label = if verifying { "Verifying..." } else { "Verify OTP" };
    let clicked = ui.add_enabled(!verifying, egui::Button::new(label)).clicked();
    let entered = !verifying && response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    clicked || entered
}
