use eframe::egui;

use crate::common::Country;
use crate::ui::state::LoginForm;

/// Returns `true` when the form was submitted.
pub fn render(ui: &mut egui::Ui, form: &mut LoginForm, countries: &[Country], loading: bool) -> bool {
    let mut submit = false;

    ui.vertical_centered(|ui| {
        ui.heading("Login / Signup");
    });
    ui.add_space(12.0);

    ui.label("Country");
    if loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading countries...");
        });
    } else {
        let selected = countries
            .iter()
            .find(|country| country.code == form.country)
            .map(Country::label)
            .unwrap_or_else(|| "Select country".to_string());
        egui::ComboBox::from_id_salt("country_selector")
            .selected_text(selected)
            .width(280.0)
            .show_ui(ui, |ui| {
                for country in countries {
                    ui.selectable_value(&mut form.country, country.code.clone(), country.label());
                }
            });
    }

    ui.add_space(8.0);
    ui.label("Phone Number");
    let response = ui.add(
        egui::TextEdit::singleline(&mut form.phone).hint_text("Enter your phone number"),
    );

    if let Some(error) = &form.error {
        ui.colored_label(egui::Color32::RED, error.as_str());
    }

    ui.add_space(8.0);
    let label = if form.sending { "Loading..." } else { "Send OTP" };
    let enabled = !form.sending && !loading;
    if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
        submit = true;
    }
    if enabled && response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        submit = true;
    }

    submit
}
