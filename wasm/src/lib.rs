use wasm_bindgen::prelude::*;
use neokult_core::{
    CharacterId, Command, Content, FrameReport, MatchConfig, MatchSession, Phase, Side, Ticket,
};
use serde::Deserialize;

/// Install panic hook so WASM panics show in browser console instead of silently freezing.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// Per-frame engine report from JS. Buttons arrive separately.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsFrame {
    dt_ms: f64,
    bodies: [JsBody; 2],
    #[serde(default)]
    overlaps: [bool; 2],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsBody {
    x: f64,
    y: f64,
    #[serde(default)]
    vx: f64,
    #[serde(default)]
    vy: f64,
    /// Arcade bodies expose this as `body.touching.down`.
    #[serde(default)]
    touching_down: bool,
}

impl From<&JsBody> for neokult_core::Body {
    fn from(b: &JsBody) -> Self {
        neokult_core::Body {
            x: b.x,
            y: b.y,
            vx: b.vx,
            vy: b.vy,
            grounded: b.touching_down,
        }
    }
}

/// Parse a JS object through JSON.stringify and serde_json.
/// serde_wasm_bindgen::from_value is stricter about numbers coming from JS.
fn from_js<T: for<'de> Deserialize<'de>>(value: &JsValue) -> Result<T, String> {
    let json = js_sys::JSON::stringify(value)
        .map_err(|_| "value is not JSON-serializable".to_string())?;
    serde_json::from_str(&String::from(json)).map_err(|e| e.to_string())
}

fn side_from_index(index: u8) -> Option<Side> {
    match index {
        0 => Some(Side::Player),
        1 => Some(Side::Opponent),
        _ => None,
    }
}

fn character_from_index(index: u8) -> CharacterId {
    CharacterId::ALL
        .get(index as usize)
        .copied()
        .unwrap_or(CharacterId::NeoRazor)
}

#[wasm_bindgen]
pub struct WasmSession {
    inner: MatchSession,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a match from a seed and a content document.
    /// Unparseable or invalid content falls back to the built-in roster.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, content_json: &str) -> WasmSession {
        let content = match Content::from_json(content_json) {
            Ok(content) => content,
            Err(e) => {
                warn(&format!("content rejected, using built-in roster: {e}"));
                Content::builtin()
            }
        };
        let config = MatchConfig {
            seed,
            ..MatchConfig::default()
        };
        WasmSession {
            inner: MatchSession::new(config, content),
        }
    }

    /// Built-in roster with explicit character picks (indices into the roster).
    pub fn with_characters(seed: u32, player: u8, opponent: u8, background: usize) -> WasmSession {
        let config = MatchConfig {
            seed,
            player: character_from_index(player),
            opponent: character_from_index(opponent),
            background,
            ..MatchConfig::default()
        };
        WasmSession {
            inner: MatchSession::new(config, Content::builtin()),
        }
    }

    /// Report one display frame. A malformed report is dropped with a warning.
    pub fn frame(&mut self, buttons: u8, report: JsValue) {
        let frame: JsFrame = match from_js(&report) {
            Ok(frame) => frame,
            Err(e) => {
                warn(&format!("frame report dropped: {e}"));
                return;
            }
        };
        self.inner.frame(&FrameReport {
            dt_ms: frame.dt_ms,
            buttons,
            bodies: [(&frame.bodies[0]).into(), (&frame.bodies[1]).into()],
            overlaps: frame.overlaps,
        });
    }

    /// Drain queued engine commands as an array of tagged objects.
    pub fn drain_commands(&mut self) -> JsValue {
        let commands: Vec<Command> = self.inner.drain_commands();
        serde_wasm_bindgen::to_value(&commands).unwrap_or(JsValue::NULL)
    }

    /// Engine callback for a clip that was played with a ticket.
    pub fn animation_complete(&mut self, generation: u32, serial: u32) {
        self.inner.animation_complete(Ticket { generation, serial });
    }

    pub fn restart(&mut self) {
        self.inner.restart();
    }

    /// Full session snapshot as a JS object.
    pub fn export_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).unwrap_or(JsValue::NULL)
    }

    /// Active hitbox of a side as `{x, y, width, height}`, or null.
    pub fn hitbox(&self, side: u8) -> JsValue {
        side_from_index(side)
            .and_then(|side| self.inner.hitbox(side))
            .and_then(|rect| serde_wasm_bindgen::to_value(&rect).ok())
            .unwrap_or(JsValue::NULL)
    }

    // Quick accessors
    pub fn phase(&self) -> String {
        match self.inner.phase() {
            Phase::Fight => "fight",
            Phase::Knockout => "knockout",
            Phase::Victory => "victory",
        }
        .to_string()
    }
    /// 0 player, 1 opponent, -1 while undecided.
    pub fn winner(&self) -> i32 {
        self.inner.winner().map_or(-1, |side| side.index() as i32)
    }
    pub fn health_ratio(&self, side: u8) -> f64 {
        side_from_index(side).map_or(0.0, |side| self.inner.health_ratio(side))
    }
    pub fn combo(&self) -> u32 { self.inner.combo().count }
    pub fn frame_count(&self) -> f64 { self.inner.frame_count() as f64 }
    pub fn generation(&self) -> u32 { self.inner.generation() }
}
