//! Emotion tag catalog
//!
//! Memories carry a free-form emotion tag. The catalog below is what the
//! editor offers; unknown values read from storage are still accepted and
//! shown verbatim.

use serde::Serialize;

/// Tag stored when a memory is created without one
pub const DEFAULT_EMOTION: &str = "peaceful";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> EmotionOption {
    EmotionOption { value, label }
}

pub const EMOTION_OPTIONS: &[EmotionOption] = &[
    opt("peaceful", "平静"),
    opt("joyful", "喜悦"),
    opt("melancholy", "忧伤"),
    opt("nostalgic", "怀念"),
    opt("mysterious", "神秘"),
    opt("hopeful", "希望"),
    opt("warm", "温暖"),
    opt("gentle", "温柔"),
    opt("lonely", "孤独"),
    opt("quiet", "静谧"),
    opt("sad", "悲伤"),
    opt("light", "轻盈"),
    opt("deep", "深沉"),
    opt("cold", "清冷"),
    opt("soft", "柔和"),
    opt("free", "自由"),
    opt("dreamy", "梦幻"),
    opt("pure", "纯净"),
    opt("romantic", "浪漫"),
    opt("weak", "淡淡"),
    opt("strong", "浓烈"),
    opt("sweet", "甜蜜"),
    opt("calm", "安宁"),
    opt("bright", "明亮"),
    opt("dim", "朦胧"),
    opt("fresh", "清新"),
    opt("faint", "微弱"),
    opt("clear", "清澈"),
    opt("foggy", "迷离"),
    opt("beautiful", "美好"),
    opt("quietly", "安然"),
    opt("chilly", "微凉"),
    opt("sunny", "明媚"),
    opt("moonlit", "月色"),
    opt("starry", "星空"),
    opt("windy", "随风"),
    opt("quiet_sad", "静谧忧伤"),
    opt("warm_memory", "温暖回忆"),
    opt("light_sad", "淡淡伤感"),
    opt("light_hope", "微光希望"),
    opt("quiet_joy", "平静喜悦"),
    opt("light_nostalgia", "浅浅怀念"),
];

/// Catalog entry for a stored tag, if it is a known one
pub fn lookup(value: &str) -> Option<&'static EmotionOption> {
    EMOTION_OPTIONS.iter().find(|o| o.value == value)
}

/// Display label: the catalog label, or the raw tag for unknown values
pub fn label_for(value: &str) -> &str {
    lookup(value).map(|o| o.label).unwrap_or(value)
}

/// First catalog entry, preselected for new memories
pub fn first_option() -> &'static EmotionOption {
    &EMOTION_OPTIONS[0]
}
