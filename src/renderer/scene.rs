//! Per-frame draw pass
//!
//! Background, both sabers, then the score labels. Never touches game state.

use glam::Vec2;

use super::{DrawSurface, Rect, TextStyle};
use crate::assets::AssetBundle;
use crate::consts::ACTOR_WALL_OFFSET;
use crate::sim::{GameState, Side};

/// Hilt placement relative to the saber anchor
const HANDLE_RECT: Rect = Rect::new(-10.0, -50.0, 20.0, 100.0);
/// Blade placement relative to the saber anchor
const BLADE_RECT: Rect = Rect::new(0.0, -200.0, 10.0, 200.0);

const SCORE_STYLE: TextStyle = TextStyle {
    font: "24px Arial",
    color: "white",
};
const SCORE_BASELINE: f32 = 30.0;
const PLAYER_LABEL_X: f32 = 20.0;
/// Distance of the AI label from the right edge
const AI_LABEL_INSET: f32 = 100.0;

/// Draw one frame of the duel
pub fn render<S: DrawSurface>(state: &GameState, assets: &AssetBundle<S::Image>, surface: &mut S) {
    let size = Vec2::new(state.arena.width, state.arena.height);

    surface.clear(size);
    surface.draw_image(&assets.background, Rect { origin: Vec2::ZERO, size });

    draw_saber(surface, assets, state, Side::Player);
    draw_saber(surface, assets, state, Side::Ai);

    draw_scores(surface, state);
}

fn draw_saber<S: DrawSurface>(
    surface: &mut S,
    assets: &AssetBundle<S::Image>,
    state: &GameState,
    side: Side,
) {
    let (x, tint) = match side {
        Side::Player => (ACTOR_WALL_OFFSET, "blue"),
        Side::Ai => (state.arena.width - ACTOR_WALL_OFFSET, "red"),
    };

    surface.save();
    surface.translate(Vec2::new(x, state.position(side)));
    if side == Side::Ai {
        // Faces inward from the right wall
        surface.scale(Vec2::new(-1.0, 1.0));
    }
    surface.draw_image(&assets.actor_handle, HANDLE_RECT);
    surface.set_fill_style(tint);
    surface.draw_image(&assets.actor_blade, BLADE_RECT);
    surface.restore();
}

fn draw_scores<S: DrawSurface>(surface: &mut S, state: &GameState) {
    surface.fill_text(
        &format!("Player: {}", state.player_score),
        Vec2::new(PLAYER_LABEL_X, SCORE_BASELINE),
        &SCORE_STYLE,
    );
    surface.fill_text(
        &format!("AI: {}", state.ai_score),
        Vec2::new(state.arena.width - AI_LABEL_INSET, SCORE_BASELINE),
        &SCORE_STYLE,
    );
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Surface operations recorded in call order
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Op {
        Clear(Vec2),
        Save,
        Restore,
        Translate(Vec2),
        Scale(Vec2),
        Fill(String),
        Image(&'static str, Rect),
        Text(String, Vec2),
    }

    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub fn frames(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, Op::Clear(_))).count()
        }

        pub fn texts(&self) -> Vec<String> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(text, _) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl DrawSurface for RecordingSurface {
        type Image = &'static str;

        fn clear(&mut self, size: Vec2) {
            self.ops.push(Op::Clear(size));
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn translate(&mut self, offset: Vec2) {
            self.ops.push(Op::Translate(offset));
        }
        fn scale(&mut self, factor: Vec2) {
            self.ops.push(Op::Scale(factor));
        }
        fn set_fill_style(&mut self, color: &str) {
            self.ops.push(Op::Fill(color.to_string()));
        }
        fn draw_image(&mut self, image: &Self::Image, dest: Rect) {
            self.ops.push(Op::Image(*image, dest));
        }
        fn fill_text(&mut self, text: &str, at: Vec2, _style: &TextStyle) {
            self.ops.push(Op::Text(text.to_string(), at));
        }
    }

    pub(crate) fn bundle() -> AssetBundle<&'static str> {
        AssetBundle {
            background: "background",
            actor_handle: "actor-handle",
            actor_blade: "actor-blade",
        }
    }

    #[test]
    fn test_render_full_frame() {
        let mut state = GameState::default();
        state.player_score = 3;
        state.ai_score = 7;
        let mut surface = RecordingSurface::default();

        render(&state, &bundle(), &mut surface);

        let expected = vec![
            Op::Clear(Vec2::new(800.0, 600.0)),
            Op::Image("background", Rect::new(0.0, 0.0, 800.0, 600.0)),
            Op::Save,
            Op::Translate(Vec2::new(100.0, 200.0)),
            Op::Image("actor-handle", HANDLE_RECT),
            Op::Fill("blue".into()),
            Op::Image("actor-blade", BLADE_RECT),
            Op::Restore,
            Op::Save,
            Op::Translate(Vec2::new(700.0, 600.0)),
            Op::Scale(Vec2::new(-1.0, 1.0)),
            Op::Image("actor-handle", HANDLE_RECT),
            Op::Fill("red".into()),
            Op::Image("actor-blade", BLADE_RECT),
            Op::Restore,
            Op::Text("Player: 3".into(), Vec2::new(20.0, 30.0)),
            Op::Text("AI: 7".into(), Vec2::new(700.0, 30.0)),
        ];
        assert_eq!(surface.ops, expected);
    }

    #[test]
    fn test_render_does_not_mutate_state() {
        let state = GameState::default();
        let before = state.clone();
        render(&state, &bundle(), &mut RecordingSurface::default());
        assert_eq!(state, before);
    }
}
