//! # Upload View
//!
//! Step one of the flow: pick a WAV or MP3 recording by path, review it,
//! and send it for analysis.

use iced::widget::{button, column, container, horizontal_space, row, text, text_input, Space};
use iced::{Alignment, Color, Element, Length};

use crate::{AppDisplayData, Message, ServiceStatus, UploadDisplay};

const ERROR_COLOR: Color = Color::from_rgb(0.94, 0.33, 0.31);
const MUTED_COLOR: Color = Color::from_rgb(0.6, 0.64, 0.7);

/// Creates the complete upload step.
pub fn create_upload_view(data: &AppDisplayData) -> Element<'static, Message> {
    let upload = &data.upload;

    let header = column![
        text("Step 1 of 2").size(14).color(MUTED_COLOR),
        text("Upload Respiratory Sound").size(28),
        text("Upload a WAV or MP3 recording of breathing sounds for AI analysis.")
            .size(16)
            .color(MUTED_COLOR),
    ]
    .spacing(6);

    let mut content = column![
        header,
        Space::with_height(20),
        create_picker_panel(upload),
    ]
    .spacing(10)
    .max_width(720);

    if let Some(file_panel) = create_file_panel(upload) {
        content = content.push(file_panel);
    }
    if let Some(error) = &upload.error {
        content = content.push(create_error_alert(error));
    }

    content = content
        .push(create_action_row(upload))
        .push(Space::with_height(10))
        .push(create_status_line(data));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .padding(30)
        .into()
}

/// Path field plus the button that selects it.
fn create_picker_panel(upload: &UploadDisplay) -> Element<'static, Message> {
    let mut field = text_input("Path to a .wav or .mp3 file", &upload.path_input).padding(10);
    let mut select = button(text("Select File"));
    if !upload.loading {
        field = field
            .on_input(Message::PathChanged)
            .on_submit(Message::ChooseFile);
        select = select.on_press(Message::ChooseFile);
    }

    container(
        column![
            text("Choose a recording").size(18),
            row![field, select].spacing(10).align_y(Alignment::Center),
            text("Supported: WAV, MP3 (max 25MB)").size(13).color(MUTED_COLOR),
        ]
        .spacing(10)
        .padding(15),
    )
    .style(container::rounded_box)
    .width(Length::Fill)
    .into()
}

/// Details of the selected recording, if one is selected.
fn create_file_panel(upload: &UploadDisplay) -> Option<Element<'static, Message>> {
    let file = upload.file.as_ref()?;

    let remove = button(text("Remove")).on_press_maybe((!upload.loading).then_some(Message::RemoveFile));

    let panel = container(
        row![
            column![
                text(file.name.clone()).size(16),
                text(file.size_label()).size(13).color(MUTED_COLOR),
            ]
            .spacing(4),
            horizontal_space(),
            remove,
        ]
        .align_y(Alignment::Center)
        .padding(12),
    )
    .style(container::rounded_box)
    .width(Length::Fill);

    Some(panel.into())
}

fn create_error_alert(message: &str) -> Element<'static, Message> {
    container(text(message.to_string()).size(15).color(ERROR_COLOR))
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// Analyze and cancel buttons, plus the shortcut to the last result.
fn create_action_row(upload: &UploadDisplay) -> Element<'static, Message> {
    let analyze_label = if upload.loading { "Analyzing…" } else { "Analyze" };
    let can_analyze = upload.file.is_some() && !upload.loading;
    let analyze = button(text(analyze_label).size(16))
        .padding([10, 24])
        .on_press_maybe(can_analyze.then_some(Message::Analyze));

    let mut actions = row![analyze].spacing(10).align_y(Alignment::Center);
    if upload.loading {
        actions = actions.push(button(text("Cancel")).on_press(Message::CancelAnalysis));
    }
    actions
        .push(horizontal_space())
        .push(button(text("View Last Result")).on_press(Message::OpenResults))
        .into()
}

fn create_status_line(data: &AppDisplayData) -> Element<'static, Message> {
    let status = match &data.service_status {
        ServiceStatus::Checking => format!("Checking analysis service at {}…", data.api_base),
        ServiceStatus::Online => format!("Analysis service online at {}", data.api_base),
        ServiceStatus::Offline(reason) => {
            format!("Analysis service unreachable at {}: {}", data.api_base, reason)
        }
    };
    text(status).size(13).color(MUTED_COLOR).into()
}
