use std::time::Instant;

use eframe::egui;

use crate::context::{AppContext, Update};

use super::attachment::encode_image_file;
use super::components::{chat_area, dashboard, input_bar, login, notifications, otp};
use super::state::{Screen, ViewState};

pub struct ChatApp {
    // Option chỉ để có thể `take()` khi dispose trong Drop
    context: Option<AppContext>,
    view: ViewState,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, context: AppContext) -> Self {
        let view = ViewState::new(context.dark_mode());
        apply_theme(&cc.egui_ctx, view.dark_mode);
        context.fetch_countries();
        Self {
            context: Some(context),
            view,
        }
    }

    fn handle_updates(&mut self, context: &mut AppContext) {
        let now = Instant::now();
        for update in context.pump_events() {
            match update {
                Update::OtpSent => {
                    self.view.login.sending = false;
                    self.view.navigate(Screen::Otp, context.config().page_size());
                }
                Update::OtpAccepted => {
                    self.view
                        .notifications
                        .success("OTP verified! Redirecting...", now);
                    self.view
                        .navigate(Screen::Dashboard, context.config().page_size());
                }
                Update::OtpRejected => {
                    self.view
                        .notifications
                        .error("Invalid OTP. Please try again.", now);
                }
                Update::CountriesLoaded {
                    countries,
                    fallback,
                } => {
                    if fallback {
                        self.view
                            .notifications
                            .error("Could not load countries; showing a short list", now);
                    }
                    self.view.countries = countries;
                    self.view.countries_loading = false;
                }
                Update::ReplyDelivered { .. } | Update::HistoryLoaded { .. } => {}
            }
        }
        self.view.notifications.prune(now);
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, context: &mut AppContext) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Gemini Chat");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if context.store().auth.is_authenticated() && ui.button("Logout").clicked() {
                        context.logout();
                    }
                    if ui.checkbox(&mut self.view.dark_mode, "Dark mode").changed() {
                        context.set_dark_mode(self.view.dark_mode);
                        apply_theme(ctx, self.view.dark_mode);
                    }
                    if let Screen::Chatroom(_) = self.view.screen {
                        if ui.button("Back").clicked() {
                            self.view
                                .navigate(Screen::Dashboard, context.config().page_size());
                        }
                    }
                });
            });
        });
    }

    fn render_login(&mut self, ui: &mut egui::Ui, context: &mut AppContext) {
        let form = &mut self.view.login;
        if !login::render(ui, form, &self.view.countries, self.view.countries_loading) {
            return;
        }
        match context.submit_login(&form.country, &form.phone) {
            Ok(()) => {
                form.error = None;
                form.sending = true;
            }
            Err(err) => form.error = Some(err.to_string()),
        }
    }

    fn render_otp(&mut self, ui: &mut egui::Ui, context: &mut AppContext) {
        let auth = context.store().auth.state();
        let destination = format!("{} {}", auth.country, auth.phone);
        let verifying = context.is_otp_busy();
        let form = &mut self.view.otp;
        if !otp::render(ui, form, &destination, verifying) {
            return;
        }
        match context.submit_otp(&form.code) {
            Ok(()) => form.error = None,
            Err(err) => form.error = Some(err.to_string()),
        }
    }

    fn render_dashboard(&mut self, ui: &mut egui::Ui, context: &mut AppContext) {
        let now = Instant::now();
        let form = &mut self.view.dashboard;
        let actions = {
            let chatrooms = context.store().chatrooms.search(&form.search);
            dashboard::render(ui, form, &chatrooms)
        };

        if actions.create {
            match context.create_chatroom(&form.title) {
                Ok(_) => {
                    form.title.clear();
                    form.error = None;
                    self.view.notifications.success("Chatroom created!", now);
                }
                Err(err) => form.error = Some(err.to_string()),
            }
        }
        if let Some(id) = actions.delete {
            if context.delete_chatroom(&id) {
                self.view.notifications.success("Chatroom deleted!", now);
            }
        }
        if let Some(id) = actions.open {
            self.view
                .navigate(Screen::Chatroom(id), context.config().page_size());
        }
    }

    fn render_chatroom(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, context: &mut AppContext) {
        let now = Instant::now();
        let Some(chatroom) = self.view.chatroom.as_mut() else {
            return;
        };
        let id = chatroom.chatroom_id.clone();

        let title = context
            .store()
            .chatrooms
            .get(&id)
            .map(|room| room.title.clone())
            .unwrap_or_else(|| "Chatroom".to_string());
        ui.vertical_centered(|ui| {
            ui.heading(title);
        });
        ui.separator();

        let projected = context.messages_for(&id);
        let ai_typing = context.is_reply_pending(&id);
        let loading_older = context.is_loading_history(&id);
        let has_more = chatroom.pagination.has_more(&projected);
        let chat_actions = chat_area::render(
            ui,
            chatroom.pagination.visible(&projected),
            has_more,
            loading_older,
            ai_typing,
        );

        if chat_actions.load_older {
            // Cửa sổ mở rộng ngay; lô tin cũ được prepend khi về
            if context.request_older(&id) {
                chatroom.pagination.next_page();
            }
        }
        if let Some(text) = chat_actions.copy {
            ctx.copy_text(text);
            self.view.notifications.success("Copied to clipboard!", now);
        }

        ui.separator();
        let input_actions = input_bar::render(
            ui,
            &mut chatroom.input_text,
            &mut chatroom.image_path,
            chatroom.image.is_some(),
            !ai_typing,
        );

        if input_actions.attach {
            match encode_image_file(chatroom.image_path.trim()) {
                Ok(encoded) => {
                    chatroom.image = Some(encoded);
                    chatroom.image_path.clear();
                }
                Err(err) => {
                    log::warn!("Failed to attach {}: {err}", chatroom.image_path);
                    self.view
                        .notifications
                        .error(format!("Could not attach image: {err}"), now);
                }
            }
        }
        if input_actions.remove_image {
            chatroom.image = None;
        }
        if input_actions.send {
            match context.send_message(&id, &chatroom.input_text, chatroom.image.clone()) {
                Ok(_) => {
                    chatroom.input_text.clear();
                    chatroom.image = None;
                }
                Err(err) => self.view.notifications.error(err.to_string(), now),
            }
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let Some(mut context) = self.context.take() else {
            return;
        };

        self.handle_updates(&mut context);
        self.view.guard(context.store().auth.is_authenticated());

        self.render_top_bar(ctx, &mut context);
        egui::CentralPanel::default().show(ctx, |ui| match self.view.screen.clone() {
            Screen::Login => self.render_login(ui, &mut context),
            Screen::Otp => self.render_otp(ui, &mut context),
            Screen::Dashboard => self.render_dashboard(ui, &mut context),
            Screen::Chatroom(_) => self.render_chatroom(ctx, ui, &mut context),
        });
        notifications::render(ctx, &mut self.view.notifications);

        self.context = Some(context);
        ctx.request_repaint();
    }
}

impl Drop for ChatApp {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            context.dispose();
        }
    }
}

fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    let visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}
