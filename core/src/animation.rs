use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::content::{CharacterId, CharacterTemplate, Clip, ClipSpec, ContentError, EffectKind};

/// Engine-facing animation key, e.g. `neorazor-attack`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationId(pub String);

impl AnimationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationEntry {
    pub id: AnimationId,
    pub spec: ClipSpec,
}

/// Mapping from (character, clip) and effect kind to animation keys and timing.
#[derive(Clone, Debug)]
pub struct AnimationTable {
    /// Row-major: `character * Clip::COUNT + clip`.
    clips: Vec<AnimationEntry>,
    /// Indexed by `EffectKind as usize`.
    effects: Vec<AnimationEntry>,
}

fn check_spec(key: &str, spec: &ClipSpec, looping: Option<bool>) -> Result<(), ContentError> {
    if spec.end < spec.start {
        return Err(ContentError::BadFrameRange {
            key: key.to_string(),
            start: spec.start,
            end: spec.end,
        });
    }
    if !(spec.frame_rate > 0.0) {
        return Err(ContentError::BadFrameRate { key: key.to_string() });
    }
    if let Some(looping) = looping.filter(|l| *l != spec.looping) {
        return Err(ContentError::BadLooping { key: key.to_string(), looping });
    }
    Ok(())
}

impl AnimationTable {
    /// `characters` must be ordered by `CharacterId`.
    pub(crate) fn build(
        characters: &[CharacterTemplate],
        effects: &BTreeMap<EffectKind, ClipSpec>,
    ) -> Result<Self, ContentError> {
        let mut seen = HashSet::new();
        let mut clips = Vec::with_capacity(CharacterId::COUNT * Clip::COUNT);

        for character in characters {
            for clip in Clip::ALL {
                let spec = character.clips.get(&clip).ok_or(ContentError::MissingClip {
                    character: character.id,
                    clip,
                })?;
                let key = format!("{}-{}", character.sheet.to_lowercase(), clip.slug());
                check_spec(&key, spec, clip.required_looping())?;
                if !seen.insert(key.clone()) {
                    return Err(ContentError::DuplicateKey(key));
                }
                clips.push(AnimationEntry {
                    id: AnimationId(key),
                    spec: *spec,
                });
            }
        }

        let mut effect_entries = Vec::with_capacity(EffectKind::COUNT);
        for kind in EffectKind::ALL {
            let spec = effects.get(&kind).ok_or(ContentError::MissingEffect(kind))?;
            let key = kind.key().to_string();
            check_spec(&key, spec, Some(false))?;
            if !seen.insert(key.clone()) {
                return Err(ContentError::DuplicateKey(key));
            }
            effect_entries.push(AnimationEntry {
                id: AnimationId(key),
                spec: *spec,
            });
        }

        Ok(AnimationTable {
            clips,
            effects: effect_entries,
        })
    }

    pub fn clip(&self, character: CharacterId, clip: Clip) -> &AnimationEntry {
        &self.clips[character as usize * Clip::COUNT + clip as usize]
    }

    pub fn effect(&self, kind: EffectKind) -> &AnimationEntry {
        &self.effects[kind as usize]
    }

    /// Reverse lookup used by engine stand-ins that only see keys.
    pub fn spec_for(&self, id: &AnimationId) -> Option<&ClipSpec> {
        self.clips
            .iter()
            .chain(self.effects.iter())
            .find(|entry| entry.id == *id)
            .map(|entry| &entry.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, ContentFile};

    #[test]
    fn keys_follow_sheet_and_clip() {
        let content = Content::builtin();
        let table = content.animations();
        assert_eq!(table.clip(CharacterId::NeoRazor, Clip::Idle).id.as_str(), "neorazor-idle");
        assert_eq!(table.clip(CharacterId::VoxSlasher, Clip::Special).id.as_str(), "voxslasher-special");
        assert_eq!(table.clip(CharacterId::EchoHex, Clip::Hit).id.as_str(), "echohex-hit");
        assert_eq!(table.effect(EffectKind::Hit).id.as_str(), "hit-effect");
    }

    #[test]
    fn every_character_has_every_clip() {
        let content = Content::builtin();
        let table = content.animations();
        for character in CharacterId::ALL {
            for clip in Clip::ALL {
                let entry = table.clip(character, clip);
                assert!(entry.id.as_str().ends_with(clip.slug()));
            }
        }
    }

    #[test]
    fn spec_lookup_by_key() {
        let content = Content::builtin();
        let table = content.animations();
        let id = AnimationId("voxslasher-block".to_string());
        assert_eq!(table.spec_for(&id).map(|s| (s.start, s.end)), Some((23, 24)));
        assert!(table.spec_for(&AnimationId("nobody-idle".to_string())).is_none());
    }

    #[test]
    fn shared_sheet_names_collide() {
        let mut file = ContentFile::builtin();
        file.characters[1].sheet = "NeoRazor".to_string();
        let err = Content::from_file(file).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateKey(ref k) if k == "neorazor-idle"));
    }

    #[test]
    fn reversed_range_and_zero_rate_are_rejected() {
        let mut file = ContentFile::builtin();
        file.characters[0].clips.get_mut(&Clip::Run).unwrap().start = 12;
        assert!(matches!(
            Content::from_file(file).unwrap_err(),
            ContentError::BadFrameRange { start: 12, end: 9, .. }
        ));

        let mut file = ContentFile::builtin();
        file.effects.get_mut(&EffectKind::Special).unwrap().frame_rate = 0.0;
        assert!(matches!(
            Content::from_file(file).unwrap_err(),
            ContentError::BadFrameRate { ref key } if key == "special-effect"
        ));
    }
}
