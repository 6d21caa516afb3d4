/// Gallery screen: search bar, thumbnail grid, pagination control,
/// selected-image panel with copy buttons, and the current address.
use iced::widget::image as image_widget;
use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Theme};
use iced_aw::Wrap;
use std::collections::HashMap;
use url::Url;

use crate::api::links;
use crate::state::data::Image;
use crate::state::gallery::{CopyButton, GalleryState};
use crate::Message;

/// Thumbnails are served as 200x200 JPEGs; shown slightly smaller
const THUMBNAIL_SIZE: f32 = 150.0;
const TILE_WIDTH: f32 = 160.0;
const TILE_GAP: u16 = 6;

/// Page buttons shown either side of the current page
const PAGE_WINDOW: usize = 2;

/// Build the whole gallery screen
pub fn view<'a>(
    gallery: &'a GalleryState,
    thumbnails: &'a HashMap<Image, Handle>,
    base_url: &Url,
) -> Element<'a, Message> {
    let search_bar = row![
        text_input("Search memes...", gallery.search())
            .on_input(Message::SearchChanged)
            .padding(10)
            .width(Length::Fill),
        button("Reset").on_press(Message::ResetSearch).padding(10),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let summary = text(format!(
        "Showing {} of {} images (page {} of {})",
        gallery.count_filtered_images(),
        gallery.total_images(),
        gallery.current_page(),
        gallery.page_count(),
    ))
    .size(14);

    let tiles: Vec<Element<'a, Message>> = gallery
        .paginated_images()
        .into_iter()
        .map(|image| tile(image, thumbnails.get(image)))
        .collect();

    let grid = Wrap::with_elements(tiles);

    let mut content = column![
        search_bar,
        summary,
        scrollable(grid).height(Length::Fill).width(Length::Fill),
        pagination(gallery),
    ]
    .spacing(16)
    .padding(20);

    if let Some(image) = gallery.selected() {
        content = content.push(selected_panel(gallery, image, base_url));
    }

    content = content.push(text(gallery.address().as_str()).size(12));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// One grid cell: thumbnail (or a placeholder while it loads) and the name
fn tile<'a>(image: &'a Image, thumbnail: Option<&'a Handle>) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match thumbnail {
        Some(handle) => image_widget(handle.clone())
            .width(Length::Fixed(THUMBNAIL_SIZE))
            .height(Length::Fixed(THUMBNAIL_SIZE))
            .into(),
        None => container(text("…").size(24))
            .center(Length::Fixed(THUMBNAIL_SIZE))
            .into(),
    };

    let card = button(
        column![preview, text(image.name()).size(12)]
            .spacing(6)
            .align_x(Alignment::Center)
            .width(Length::Fixed(TILE_WIDTH)),
    )
    .on_press(Message::ImageSelected(image.clone()))
    .style(button::text);

    container(card).padding(TILE_GAP).into()
}

/// Prev / numbered pages / Next. Only valid page numbers are offered.
fn pagination<'a>(gallery: &GalleryState) -> Element<'a, Message> {
    let current = gallery.current_page();
    let count = gallery.page_count();

    // From a page past the end, "Prev" jumps back to the last real page
    let previous = (current > 1).then(|| Message::PageSelected((current - 1).min(count.max(1))));
    let next = (current < count).then(|| Message::PageSelected(current + 1));

    let mut controls = row![button("‹ Prev").on_press_maybe(previous)]
        .spacing(6)
        .align_y(Alignment::Center);

    for entry in page_window(current, count) {
        controls = controls.push(match entry {
            Some(page) => page_button(page, page == current),
            None => text("…").into(),
        });
    }

    controls
        .push(button("Next ›").on_press_maybe(next))
        .into()
}

fn page_button<'a>(page: usize, is_current: bool) -> Element<'a, Message> {
    button(text(page.to_string()))
        .on_press(Message::PageSelected(page))
        .style(move |theme: &Theme, status| {
            if is_current {
                button::primary(theme, status)
            } else {
                button::secondary(theme, status)
            }
        })
        .into()
}

/// Pages to offer: first, last and a window around `current`.
/// `None` marks a gap.
pub fn page_window(current: usize, count: usize) -> Vec<Option<usize>> {
    let mut entries = Vec::new();
    let mut last_shown = 0;

    for page in 1..=count {
        // Always show both ends so the user can jump there directly
        if page == 1 || page == count || page.abs_diff(current) <= PAGE_WINDOW {
            if page > last_shown + 1 {
                entries.push(None);
            }
            entries.push(Some(page));
            last_shown = page;
        }
    }

    entries
}

fn selected_panel<'a>(
    gallery: &GalleryState,
    image: &'a Image,
    base_url: &Url,
) -> Element<'a, Message> {
    row![
        column![
            text(image.name()).size(16),
            text(links::info_link(base_url, image).to_string()).size(12),
        ]
        .spacing(4),
        horizontal_space(),
        copy_button("Copy link", CopyButton::Direct, gallery),
        copy_button("Copy Markdown", CopyButton::Markdown, gallery),
        button("Close")
            .on_press(Message::CloseImage)
            .style(button::secondary),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

/// Copy button that reads "Copied!" while its highlight flag is on
fn copy_button<'a>(
    label: &'a str,
    which: CopyButton,
    gallery: &GalleryState,
) -> Element<'a, Message> {
    let highlighted = gallery.is_highlighted(which);

    button(if highlighted { "Copied!" } else { label })
        .on_press(Message::CopyLink(which))
        .style(move |theme: &Theme, status| {
            if highlighted {
                button::success(theme, status)
            } else {
                button::primary(theme, status)
            }
        })
        .into()
}
