//! Drawing of hand landmarks and control state onto preview frames.

use crate::control::{FrameReport, MAX_ANGLE};
use crate::landmarks::{ids, Hand};
use image::{Rgb, RgbImage};

const FINGERTIP_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const CONTROL_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const EXIT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const GAUGE_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
const GAUGE_FRAME_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const FINGERTIP_RADIUS: i32 = 12;
const MIDPOINT_RADIUS: i32 = 8;
const LINE_THICKNESS: i32 = 3;

const GAUGE_X: i32 = 50;
const GAUGE_Y: i32 = 30;
const GAUGE_WIDTH: i32 = 180;
const GAUGE_HEIGHT: i32 = 16;

const ANGLE_LABEL_X: i32 = 50;
const ANGLE_LABEL_Y: i32 = 50;

/// Each font pixel is drawn as a `LABEL_SCALE`×`LABEL_SCALE` block
const LABEL_SCALE: i32 = 3;
const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

/// Annotate a frame with labelled fingertips of every hand, the control and
/// exit lines of the primary hand with their distances, and the current angle
pub fn annotate(frame: &mut RgbImage, hands: &[Hand], report: &FrameReport) {
    for hand in hands {
        for id in ids::FINGERTIPS {
            if let Some(tip) = hand.get(id) {
                draw_disc(frame, tip.x as i32, tip.y as i32, FINGERTIP_RADIUS, FINGERTIP_COLOR);
                draw_label(
                    frame,
                    &id.to_string(),
                    tip.x as i32 - 10,
                    tip.y as i32 - FINGERTIP_RADIUS - GLYPH_HEIGHT * LABEL_SCALE - 2,
                    LABEL_COLOR,
                );
            }
        }
    }

    if let Some(geometry) = &report.geometry {
        let (thumb, index, middle) = (geometry.thumb_tip, geometry.index_tip, geometry.middle_tip);

        let control_mid = (((thumb.x + index.x) / 2.0) as i32, ((thumb.y + index.y) / 2.0) as i32);
        draw_line(frame, (thumb.x, thumb.y), (index.x, index.y), CONTROL_COLOR);
        draw_disc(frame, control_mid.0, control_mid.1, MIDPOINT_RADIUS, CONTROL_COLOR);
        draw_label(
            frame,
            &format!("Dist: {}", geometry.control_distance as u32),
            control_mid.0 + 10,
            control_mid.1 + 10,
            CONTROL_COLOR,
        );

        let exit_mid = (((index.x + middle.x) / 2.0) as i32, ((index.y + middle.y) / 2.0) as i32);
        draw_line(frame, (index.x, index.y), (middle.x, middle.y), EXIT_COLOR);
        draw_label(
            frame,
            &format!("Exit: {}", geometry.exit_distance as u32),
            exit_mid.0 + 10,
            exit_mid.1 + 10,
            EXIT_COLOR,
        );
    }

    if let Some(angle) = report.angle {
        draw_gauge(frame, angle.degrees());
        draw_label(
            frame,
            &format!("Angle: {}", angle),
            ANGLE_LABEL_X,
            ANGLE_LABEL_Y,
            GAUGE_COLOR,
        );
    }
}

/// Text in the 3×5 bitmap font, top-left corner at (x, y)
fn draw_label(frame: &mut RgbImage, text: &str, x: i32, y: i32, color: Rgb<u8>) {
    let mut cx = x;
    for ch in text.chars() {
        for (row, &bits) in char_glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    fill_rect(
                        frame,
                        cx + col * LABEL_SCALE,
                        y + row as i32 * LABEL_SCALE,
                        LABEL_SCALE,
                        LABEL_SCALE,
                        color,
                    );
                }
            }
        }
        cx += (GLYPH_WIDTH + 1) * LABEL_SCALE;
    }
}

/// Horizontal bar filled in proportion to `degrees` over the servo range
fn draw_gauge(frame: &mut RgbImage, degrees: u8) {
    let filled = GAUGE_WIDTH * degrees as i32 / MAX_ANGLE as i32;
    fill_rect(frame, GAUGE_X, GAUGE_Y, filled, GAUGE_HEIGHT, GAUGE_COLOR);

    let (right, bottom) = (GAUGE_X + GAUGE_WIDTH, GAUGE_Y + GAUGE_HEIGHT);
    fill_rect(frame, GAUGE_X, GAUGE_Y, GAUGE_WIDTH, 1, GAUGE_FRAME_COLOR);
    fill_rect(frame, GAUGE_X, bottom, GAUGE_WIDTH + 1, 1, GAUGE_FRAME_COLOR);
    fill_rect(frame, GAUGE_X, GAUGE_Y, 1, GAUGE_HEIGHT, GAUGE_FRAME_COLOR);
    fill_rect(frame, right, GAUGE_Y, 1, GAUGE_HEIGHT, GAUGE_FRAME_COLOR);
}

fn put(frame: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < frame.width() && (y as u32) < frame.height() {
        frame.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(frame: &mut RgbImage, x: i32, y: i32, width: i32, height: i32, color: Rgb<u8>) {
    for py in y..y + height {
        for px in x..x + width {
            put(frame, px, py, color);
        }
    }
}

fn draw_disc(frame: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Thick line drawn as a run of small discs
fn draw_line(frame: &mut RgbImage, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
    let radius = LINE_THICKNESS / 2;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (from.0 + dx * t).round() as i32;
        let y = (from.1 + dy * t).round() as i32;
        draw_disc(frame, x, y, radius, color);
    }
}

/// Glyphs for the characters the overlay prints, 5 rows of 3 bits
fn char_glyph(c: char) -> [u8; GLYPH_HEIGHT as usize] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'e' => [0b111, 0b101, 0b111, 0b100, 0b111],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'i' => [0b010, 0b000, 0b010, 0b010, 0b010],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'n' => [0b000, 0b110, 0b101, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b010, 0b111, 0b010, 0b010, 0b011],
        'x' => [0b000, 0b101, 0b010, 0b010, 0b101],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}
