use eframe::egui;

use crate::ui::state::{NoticeKind, Notifications};

pub fn render(ctx: &egui::Context, notifications: &mut Notifications) {
    if notifications.items().is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .show(ctx, |ui| {
            for (index, item) in notifications.items().iter().enumerate() {
                let color = match item.kind {
                    NoticeKind::Success => egui::Color32::from_rgb(22, 163, 74),
                    NoticeKind::Error => egui::Color32::from_rgb(220, 38, 38),
                };
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(color, item.text.as_str());
                        if ui.small_button("x").clicked() {
                            dismissed = Some(index);
                        }
                    });
                });
            }
        });

    if let Some(index) = dismissed {
        notifications.dismiss(index);
    }
}
