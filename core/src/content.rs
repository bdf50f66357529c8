//! Static game content: character templates, sprite-sheet clip layouts,
//! effect clips and stage backgrounds.
//!
//! Content is either the compiled-in table ([`Content::builtin`]) or a JSON
//! document in the [`ContentFile`] format. Both go through the same
//! validation, so a [`Content`] value always has every character, every clip
//! and a unique animation key per (character, clip).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::AnimationTable;
use crate::types::{AttackKind, AttackProfile, AttackSet, Mode};

// ── Identifiers ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    NeoRazor = 0,
    VoxSlasher = 1,
    EchoHex = 2,
}

impl CharacterId {
    pub const COUNT: usize = 3;
    pub const ALL: [CharacterId; Self::COUNT] =
        [CharacterId::NeoRazor, CharacterId::VoxSlasher, CharacterId::EchoHex];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clip {
    Idle = 0,
    Run = 1,
    Jump = 2,
    Attack = 3,
    Special = 4,
    Block = 5,
    Hit = 6,
}

impl Clip {
    pub const COUNT: usize = 7;
    pub const ALL: [Clip; Self::COUNT] = [
        Clip::Idle,
        Clip::Run,
        Clip::Jump,
        Clip::Attack,
        Clip::Special,
        Clip::Block,
        Clip::Hit,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Clip::Idle => "idle",
            Clip::Run => "run",
            Clip::Jump => "jump",
            Clip::Attack => "attack",
            Clip::Special => "special",
            Clip::Block => "block",
            Clip::Hit => "hit",
        }
    }

    /// Required `looping` flag, if any. Attack, special and hit clips must
    /// complete to release the fighter; idle and run are shown indefinitely.
    pub fn required_looping(self) -> Option<bool> {
        match self {
            Clip::Idle | Clip::Run => Some(true),
            Clip::Attack | Clip::Special | Clip::Hit => Some(false),
            Clip::Jump | Clip::Block => None,
        }
    }

    pub fn for_attack(kind: AttackKind) -> Clip {
        match kind {
            AttackKind::Basic => Clip::Attack,
            AttackKind::Special => Clip::Special,
        }
    }

    /// Clip shown for a mode that the per-frame update animates itself.
    /// Attacking and Hit are animated when they start, not every frame.
    pub fn for_mode(mode: Mode) -> Option<Clip> {
        match mode {
            Mode::Idle => Some(Clip::Idle),
            Mode::Moving => Some(Clip::Run),
            Mode::Jumping => Some(Clip::Jump),
            Mode::Blocking => Some(Clip::Block),
            Mode::Attacking | Mode::Hit => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Hit = 0,
    Special = 1,
}

impl EffectKind {
    pub const COUNT: usize = 2;
    pub const ALL: [EffectKind; Self::COUNT] = [EffectKind::Hit, EffectKind::Special];

    pub fn key(self) -> &'static str {
        match self {
            EffectKind::Hit => "hit-effect",
            EffectKind::Special => "special-effect",
        }
    }
}

// ── Clip timing ─────────────────────────────────────────────

/// Inclusive frame range on a sprite sheet plus playback rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipSpec {
    pub start: u32,
    pub end: u32,
    pub frame_rate: f64,
    #[serde(default)]
    pub looping: bool,
}

impl ClipSpec {
    const fn once(start: u32, end: u32, frame_rate: f64) -> Self {
        ClipSpec { start, end, frame_rate, looping: false }
    }

    const fn looped(start: u32, end: u32, frame_rate: f64) -> Self {
        ClipSpec { start, end, frame_rate, looping: true }
    }

    pub fn frame_count(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    /// Play time of one pass; `None` for looping clips, which never complete.
    pub fn duration_ms(&self) -> Option<f64> {
        if self.looping {
            None
        } else {
            Some(self.frame_count() as f64 * 1000.0 / self.frame_rate)
        }
    }
}

/// Clip layout shared by every character sheet.
pub fn default_clips() -> BTreeMap<Clip, ClipSpec> {
    BTreeMap::from([
        (Clip::Idle, ClipSpec::looped(0, 3, 8.0)),
        (Clip::Run, ClipSpec::looped(4, 9, 10.0)),
        (Clip::Jump, ClipSpec::once(10, 12, 8.0)),
        (Clip::Attack, ClipSpec::once(13, 16, 12.0)),
        (Clip::Special, ClipSpec::once(17, 22, 10.0)),
        (Clip::Block, ClipSpec::once(23, 24, 8.0)),
        (Clip::Hit, ClipSpec::once(25, 27, 8.0)),
    ])
}

fn default_effects() -> BTreeMap<EffectKind, ClipSpec> {
    BTreeMap::from([
        (EffectKind::Hit, ClipSpec::once(0, 5, 15.0)),
        (EffectKind::Special, ClipSpec::once(0, 7, 10.0)),
    ])
}

// ── Templates ───────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterTemplate {
    pub id: CharacterId,
    pub name: String,
    /// Sprite-sheet key, also the prefix of the character's animation keys.
    pub sheet: String,
    pub health: i32,
    pub speed: f64,
    pub jump_power: f64,
    pub attacks: AttackSet,
    #[serde(default = "default_clips")]
    pub clips: BTreeMap<Clip, ClipSpec>,
}

fn template(
    id: CharacterId,
    name: &str,
    health: i32,
    speed: f64,
    jump_power: f64,
    basic: (i32, u32, f64),
    special: (i32, u32, f64),
) -> CharacterTemplate {
    let profile = |(damage, cooldown_ms, range): (i32, u32, f64)| AttackProfile {
        damage,
        cooldown_ms,
        range,
    };
    CharacterTemplate {
        id,
        name: name.to_string(),
        sheet: name.to_lowercase(),
        health,
        speed,
        jump_power,
        attacks: AttackSet {
            basic: profile(basic),
            special: profile(special),
        },
        clips: default_clips(),
    }
}

/// Serialized content document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFile {
    pub characters: Vec<CharacterTemplate>,
    #[serde(default = "default_effects")]
    pub effects: BTreeMap<EffectKind, ClipSpec>,
    pub backgrounds: Vec<String>,
}

impl ContentFile {
    pub fn builtin() -> Self {
        ContentFile {
            characters: vec![
                template(CharacterId::NeoRazor, "NeoRazor", 100, 250.0, 600.0, (5, 300, 100.0), (20, 2000, 150.0)),
                template(CharacterId::VoxSlasher, "VoxSlasher", 120, 200.0, 550.0, (7, 400, 90.0), (25, 3000, 130.0)),
                template(CharacterId::EchoHex, "EchoHex", 90, 300.0, 650.0, (4, 250, 110.0), (18, 1800, 180.0)),
            ],
            effects: default_effects(),
            backgrounds: vec![
                "ruins-city".to_string(),
                "neon-district".to_string(),
                "wasteland".to_string(),
            ],
        }
    }
}

// ── Errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("character {0:?} is defined more than once")]
    DuplicateCharacter(CharacterId),

    #[error("character {0:?} is not defined")]
    MissingCharacter(CharacterId),

    #[error("{0:?}: health, speed, jump power and attack damage must be positive")]
    BadStats(CharacterId),

    #[error("{character:?} has no {clip:?} clip")]
    MissingClip { character: CharacterId, clip: Clip },

    #[error("missing {0:?} effect clip")]
    MissingEffect(EffectKind),

    #[error("{key}: frame range {start}..={end} is reversed")]
    BadFrameRange { key: String, start: u32, end: u32 },

    #[error("{key}: frame rate must be positive")]
    BadFrameRate { key: String },

    #[error("{key}: looping must be {looping}")]
    BadLooping { key: String, looping: bool },

    #[error("animation key {0} is used twice")]
    DuplicateKey(String),

    #[error("no backgrounds defined")]
    NoBackgrounds,
}

// ── Validated content ───────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Content {
    /// Indexed by `CharacterId as usize`.
    characters: Vec<CharacterTemplate>,
    backgrounds: Vec<String>,
    animations: AnimationTable,
}

impl Content {
    pub fn builtin() -> Self {
        Self::from_file(ContentFile::builtin()).expect("built-in content is valid")
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let file: ContentFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    pub fn from_file(file: ContentFile) -> Result<Self, ContentError> {
        let mut slots: Vec<Option<CharacterTemplate>> = vec![None; CharacterId::COUNT];
        for character in file.characters {
            let id = character.id;
            let stats_ok = character.health > 0
                && character.speed > 0.0
                && character.jump_power > 0.0
                && character.attacks.basic.damage > 0
                && character.attacks.special.damage > 0;
            if !stats_ok {
                return Err(ContentError::BadStats(id));
            }
            let slot = &mut slots[id as usize];
            if slot.is_some() {
                return Err(ContentError::DuplicateCharacter(id));
            }
            *slot = Some(character);
        }

        let mut characters = Vec::with_capacity(CharacterId::COUNT);
        for (id, slot) in CharacterId::ALL.into_iter().zip(slots) {
            characters.push(slot.ok_or(ContentError::MissingCharacter(id))?);
        }

        if file.backgrounds.is_empty() {
            return Err(ContentError::NoBackgrounds);
        }

        let animations = AnimationTable::build(&characters, &file.effects)?;

        Ok(Content {
            characters,
            backgrounds: file.backgrounds,
            animations,
        })
    }

    pub fn template(&self, id: CharacterId) -> &CharacterTemplate {
        &self.characters[id as usize]
    }

    pub fn templates(&self) -> &[CharacterTemplate] {
        &self.characters
    }

    pub fn animations(&self) -> &AnimationTable {
        &self.animations
    }

    /// Background key for an index; out-of-range indices use the first stage.
    pub fn background(&self, index: usize) -> &str {
        self.backgrounds
            .get(index)
            .unwrap_or(&self.backgrounds[0])
    }

    pub fn backgrounds(&self) -> &[String] {
        &self.backgrounds
    }

    pub fn to_file(&self) -> ContentFile {
        ContentFile {
            characters: self.characters.clone(),
            effects: EffectKind::ALL
                .into_iter()
                .map(|kind| (kind, self.animations.effect(kind).spec))
                .collect(),
            backgrounds: self.backgrounds.clone(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_matches_templates() {
        let content = Content::builtin();
        let razor = content.template(CharacterId::NeoRazor);
        assert_eq!(razor.name, "NeoRazor");
        assert_eq!(razor.health, 100);
        assert_eq!(razor.attacks.basic.damage, 5);
        assert_eq!(razor.attacks.special.cooldown_ms, 2000);

        let vox = content.template(CharacterId::VoxSlasher);
        assert_eq!(vox.health, 120);
        assert_eq!(vox.speed, 200.0);
        assert_eq!(vox.attacks.special.damage, 25);

        let echo = content.template(CharacterId::EchoHex);
        assert_eq!(echo.jump_power, 650.0);
        assert_eq!(echo.attacks.basic.cooldown_ms, 250);
        assert_eq!(content.background(0), "ruins-city");
        assert_eq!(content.background(99), "ruins-city");
    }

    #[test]
    fn json_round_trip_keeps_content() {
        let content = Content::builtin();
        let json = serde_json::to_string(&content.to_file()).unwrap();
        let reloaded = Content::from_json(&json).unwrap();
        assert_eq!(reloaded.templates(), content.templates());
        assert_eq!(reloaded.backgrounds(), content.backgrounds());
    }

    #[test]
    fn clips_default_when_omitted() {
        let mut value = serde_json::to_value(ContentFile::builtin()).unwrap();
        for character in value["characters"].as_array_mut().unwrap() {
            character.as_object_mut().unwrap().remove("clips");
        }
        value.as_object_mut().unwrap().remove("effects");
        let content = Content::from_json(&value.to_string()).unwrap();
        assert_eq!(content.template(CharacterId::EchoHex).clips, default_clips());
    }

    #[test]
    fn missing_character_is_rejected() {
        let mut file = ContentFile::builtin();
        file.characters.retain(|c| c.id != CharacterId::EchoHex);
        let err = Content::from_file(file).unwrap_err();
        assert!(matches!(err, ContentError::MissingCharacter(CharacterId::EchoHex)));
    }

    #[test]
    fn duplicate_character_is_rejected() {
        let mut file = ContentFile::builtin();
        let copy = file.characters[0].clone();
        file.characters.push(copy);
        let err = Content::from_file(file).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateCharacter(CharacterId::NeoRazor)));
    }

    #[test]
    fn non_positive_stats_are_rejected() {
        let mut file = ContentFile::builtin();
        file.characters[1].health = 0;
        let err = Content::from_file(file).unwrap_err();
        assert!(matches!(err, ContentError::BadStats(CharacterId::VoxSlasher)));
    }

    #[test]
    fn missing_clip_is_rejected() {
        let mut file = ContentFile::builtin();
        file.characters[2].clips.remove(&Clip::Block);
        let err = Content::from_file(file).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingClip { character: CharacterId::EchoHex, clip: Clip::Block }
        ));
    }

    #[test]
    fn looping_attack_clip_is_rejected() {
        let mut file = ContentFile::builtin();
        if let Some(spec) = file.characters[0].clips.get_mut(&Clip::Attack) {
            spec.looping = true;
        }
        let err = Content::from_file(file).unwrap_err();
        assert!(matches!(
            err,
            ContentError::BadLooping { ref key, looping: false } if key == "neorazor-attack"
        ));
    }

    #[test]
    fn one_shot_idle_clip_is_rejected() {
        let mut file = ContentFile::builtin();
        if let Some(spec) = file.characters[1].clips.get_mut(&Clip::Idle) {
            spec.looping = false;
        }
        assert!(matches!(
            Content::from_file(file),
            Err(ContentError::BadLooping { looping: true, .. })
        ));
    }

    #[test]
    fn looping_effect_is_rejected() {
        let mut file = ContentFile::builtin();
        if let Some(spec) = file.effects.get_mut(&EffectKind::Hit) {
            spec.looping = true;
        }
        assert!(matches!(
            Content::from_file(file),
            Err(ContentError::BadLooping { looping: false, .. })
        ));
    }

    #[test]
    fn empty_backgrounds_are_rejected() {
        let mut file = ContentFile::builtin();
        file.backgrounds.clear();
        assert!(matches!(Content::from_file(file), Err(ContentError::NoBackgrounds)));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = Content::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ContentError::Json(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn clip_durations() {
        let clips = default_clips();
        assert_eq!(clips[&Clip::Idle].duration_ms(), None);
        let attack = clips[&Clip::Attack].duration_ms().unwrap();
        assert!((attack - 333.333).abs() < 0.01);
        assert_eq!(clips[&Clip::Special].duration_ms(), Some(600.0));
        assert_eq!(clips[&Clip::Hit].duration_ms(), Some(375.0));
    }
}
