use std::time::Instant;

use chrono::Utc;
use egui::{Align2, Color32, CursorIcon, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use machine_gantt::model::controller::TooltipView;
use machine_gantt::model::ticks::LabelAlign;
use machine_gantt::model::{HitTarget, LaidOutBar, TimelineController, TimelineEvent, TimelineFrame};
use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const LABEL_GUTTER: f32 = theme::LABEL_GUTTER;

/// Pointer bookkeeping carried between paints.
#[derive(Debug, Default)]
pub struct ChartState {
    hovered_bar: Option<String>,
    over_tooltip: bool,
    tooltip_rect: Option<Rect>,
    last_track_size: Option<Vec2>,
}

/// Render the timeline (central panel) and feed pointer input to the controller.
pub fn show_timeline_chart(controller: &mut TimelineController, state: &mut ChartState, ui: &mut Ui) {
    let now = Instant::now();
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    let header = Rect::from_min_max(
        Pos2::new(rect.left() + LABEL_GUTTER, rect.top()),
        Pos2::new(rect.right(), rect.top() + HEADER_HEIGHT),
    );
    let gutter = Rect::from_min_max(
        Pos2::new(rect.left(), rect.top() + HEADER_HEIGHT),
        Pos2::new(rect.left() + LABEL_GUTTER, rect.bottom()),
    );
    let track = Rect::from_min_max(
        Pos2::new(rect.left() + LABEL_GUTTER, rect.top() + HEADER_HEIGHT),
        rect.max,
    );

    let size = track.size();
    if state.last_track_size != Some(size) {
        state.last_track_size = Some(size);
        controller.apply(
            TimelineEvent::Resized {
                track_width: size.x as f64,
                viewport_height: size.y as f64,
            },
            now,
        );
    }

    if response.hovered() {
        let dy = ui.input(|i| i.smooth_scroll_delta.y);
        if dy != 0.0 {
            let scroll_top = controller.scroll_top() - dy as f64;
            controller.apply(TimelineEvent::Scrolled { scroll_top }, now);
        }
    }

    for event in pointer_events(controller, state, ui, track) {
        controller.apply(event, now);
    }

    if controller.is_dragging() {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
    } else if state.hovered_bar.is_some() {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }

    let frame = controller.frame();
    let selected = controller.selection().selected.clone();

    painter.rect_filled(rect, 0.0, theme::BG_DARK);
    draw_rows(&painter, &frame, gutter, track);
    draw_grid(&painter, &frame, header, track);
    draw_bars(&painter, &frame, track, selected.as_deref());
    draw_now_line(&painter, &frame, header, track);

    state.tooltip_rect = frame
        .tooltip
        .as_ref()
        .map(|tip| show_tooltip(ui.ctx(), &frame, tip, track));
}

/// Translate raw pointer input into timeline events.
fn pointer_events(
    controller: &TimelineController,
    state: &mut ChartState,
    ui: &Ui,
    track: Rect,
) -> Vec<TimelineEvent> {
    let (hover, interact, pressed, down, released) = ui.input(|i| {
        (
            i.pointer.hover_pos(),
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.pointer.primary_released(),
        )
    });
    let mut events = Vec::new();

    let over_tooltip = matches!((hover, state.tooltip_rect), (Some(p), Some(r)) if r.contains(p));
    if over_tooltip != state.over_tooltip {
        state.over_tooltip = over_tooltip;
        events.push(if over_tooltip {
            TimelineEvent::TooltipEntered
        } else {
            TimelineEvent::TooltipLeft
        });
    }

    let to_content = |p: Pos2| {
        (
            (p.x - track.left()) as f64,
            (p.y - track.top()) as f64 + controller.scroll_top(),
        )
    };
    let frame = controller.frame();
    let bar_under = |p: Pos2| -> Option<String> {
        if !track.contains(p) {
            return None;
        }
        let (x, y) = to_content(p);
        frame.bar_at(x, y).map(|bar| bar.id.clone())
    };

    let hovered = if over_tooltip { None } else { hover.and_then(&bar_under) };
    if hovered != state.hovered_bar {
        if let Some(old) = state.hovered_bar.take() {
            events.push(TimelineEvent::BarLeft { item_id: old });
        }
        if let (Some(id), Some(p)) = (&hovered, hover) {
            events.push(TimelineEvent::BarEntered {
                item_id: id.clone(),
                anchor: to_content(p),
            });
        }
        state.hovered_bar = hovered;
    }

    if let Some(p) = interact {
        if pressed && track.contains(p) && !over_tooltip {
            events.push(TimelineEvent::PointerDown { x: to_content(p).0 });
        } else if down {
            events.push(TimelineEvent::PointerMoved { x: to_content(p).0 });
        }
        if released {
            let target = bar_under(p).map_or(HitTarget::Background, HitTarget::Bar);
            events.push(TimelineEvent::PointerReleased { target });
        }
    }

    events
}

fn draw_rows(painter: &egui::Painter, frame: &TimelineFrame<'_>, gutter: Rect, track: Rect) {
    let body = painter.with_clip_rect(track);
    let names = painter.with_clip_rect(gutter);
    let row_h = frame.row_height as f32;

    names.rect_filled(gutter, 0.0, theme::BG_PANEL);
    for row in &frame.rows {
        let y = track.top() + (row.top - frame.scroll_top) as f32;
        if row.index % 2 == 0 {
            body.rect_filled(
                Rect::from_min_size(Pos2::new(track.left(), y), Vec2::new(track.width(), row_h)),
                0.0,
                Color32::from_rgba_premultiplied(255, 255, 255, 5),
            );
        }
        body.line_segment(
            [Pos2::new(track.left(), y + row_h), Pos2::new(track.right(), y + row_h)],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
        names.text(
            Pos2::new(gutter.left() + 8.0, y + row_h / 2.0),
            Align2::LEFT_CENTER,
            &row.resource.name,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
    }
    painter.line_segment(
        [gutter.right_top(), gutter.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_grid(painter: &egui::Painter, frame: &TimelineFrame<'_>, header: Rect, track: Rect) {
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let body = painter.with_clip_rect(track);
    for tick in &frame.ticks.minor {
        let x = track.left() + tick.x as f32;
        body.line_segment(
            [Pos2::new(x, track.top()), Pos2::new(x, track.bottom())],
            Stroke::new(0.5, theme::GRID_MINOR),
        );
    }

    let full = painter.with_clip_rect(header.union(track));
    for tick in &frame.ticks.major {
        let x = track.left() + tick.x as f32;
        full.line_segment(
            [Pos2::new(x, header.top() + HEADER_HEIGHT * 0.5), Pos2::new(x, track.bottom())],
            Stroke::new(1.0, theme::GRID_MAJOR),
        );
    }

    let labels = painter.with_clip_rect(header);
    let y = header.center().y;
    for label in &frame.ticks.labels {
        let x = header.left() + label.x as f32;
        let (pos, align) = match label.align {
            LabelAlign::Left => (Pos2::new(x + 4.0, y), Align2::LEFT_CENTER),
            LabelAlign::Center => (Pos2::new(x, y), Align2::CENTER_CENTER),
        };
        labels.text(pos, align, &label.text, theme::font_header(), theme::TEXT_SECONDARY);
    }
}

fn draw_bars(painter: &egui::Painter, frame: &TimelineFrame<'_>, track: Rect, selected: Option<&str>) {
    let body = painter.with_clip_rect(track);
    let inset = theme::BAR_INSET;
    let bar_h = (frame.row_height as f32 - inset * 2.0).max(2.0);

    for row in &frame.rows {
        let y = track.top() + (row.top - frame.scroll_top) as f32 + inset;
        for bar in &row.bars {
            let bar_rect = Rect::from_min_size(
                Pos2::new(track.left() + bar.x as f32, y),
                Vec2::new(bar.width as f32, bar_h),
            );
            if !bar_rect.intersects(track) {
                continue;
            }
            draw_bar(&body, bar_rect, bar, frame.is_emphasized(bar), selected == Some(bar.id.as_str()));
        }
    }
}

fn draw_bar(painter: &egui::Painter, bar_rect: Rect, bar: &LaidOutBar, emphasized: bool, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let fill = if emphasized {
        bar.color
    } else {
        bar.color.gamma_multiply(theme::DIM_FACTOR)
    };
    painter.rect_filled(bar_rect, rounding, fill);

    if bar.hatch {
        let hatch = painter.with_clip_rect(bar_rect.intersect(painter.clip_rect()));
        let h = bar_rect.height();
        let stroke = Stroke::new(
            1.5,
            if emphasized {
                theme::HATCH
            } else {
                theme::HATCH.gamma_multiply(theme::DIM_FACTOR)
            },
        );
        let mut x = bar_rect.left() - h;
        while x < bar_rect.right() {
            hatch.line_segment(
                [Pos2::new(x, bar_rect.bottom()), Pos2::new(x + h, bar_rect.top())],
                stroke,
            );
            x += theme::HATCH_SPACING;
        }
    }

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_rect.width() > 40.0 && emphasized {
        let clipped = painter.with_clip_rect(bar_rect.intersect(painter.clip_rect()));
        clipped.text(
            Pos2::new(bar_rect.left() + 5.0, bar_rect.center().y),
            Align2::LEFT_CENTER,
            &bar.label,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    }
}

fn draw_now_line(painter: &egui::Painter, frame: &TimelineFrame<'_>, header: Rect, track: Rect) {
    let Some(now_x) = frame.now_x(Utc::now()) else {
        return;
    };
    let x = track.left() + now_x as f32;
    painter.line_segment(
        [Pos2::new(x, header.top()), Pos2::new(x, track.bottom())],
        Stroke::new(1.5, theme::NOW_LINE),
    );
}

fn show_tooltip(
    ctx: &egui::Context,
    frame: &TimelineFrame<'_>,
    tip: &TooltipView<'_>,
    track: Rect,
) -> Rect {
    let pos = Pos2::new(
        track.left() + tip.content.anchor_x as f32 + theme::TOOLTIP_OFFSET,
        track.top() + (tip.content.anchor_y - frame.scroll_top) as f32 + theme::TOOLTIP_OFFSET,
    );
    let fmt = |t: Option<chrono::DateTime<Utc>>| {
        t.map(|t| t.with_timezone(&frame.tz).format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_else(|| "n/a".to_string())
    };
    let item = tip.item;

    egui::Area::new(Id::new("bar-tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.strong(item.display_label());
                ui.label(tip.resource_name);
                ui.label(format!("{} → {}", fmt(item.start), fmt(item.end)));
                ui.label(format!("Status: {}", item.status.label()));
                if let Some(wo) = &item.work_order {
                    ui.label(format!("Work order: {wo}"));
                }
                if let Some(so) = &item.sales_order {
                    ui.label(format!("Sales order: {so}"));
                }
            });
        })
        .response
        .rect
}
