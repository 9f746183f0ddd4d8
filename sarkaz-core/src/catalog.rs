//! Static catalog of the Sarkaz roguelike: squads, collectibles, operations and
//! the operators that can be banned, together with their fixed scoring data.
//!
//! Every entry is identified by a closed enum. The serialized form of each
//! variant is its in-game label, which is what saved sessions contain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raised when a label does not name any entry of a catalog enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {label}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub label: String,
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant, )+
        }

        impl $name {
            /// Every entry, in catalog order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// The in-game label, also used as the persisted form.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            /// Accepts the label or the variant identifier (ASCII case-insensitive).
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s == $label || s.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownLabel {
                    kind: stringify!($name),
                    label: s.to_string(),
                })
            }
        }
    };
}

labelled_enum! {
    /// Starting squad picked at the beginning of a run.
    pub enum Squad {
        CommandSquad => "指挥分队",
        GatheringSquad => "集群分队",
        SupportSquad => "后勤分队",
        SpearheadSquad => "矛头分队",
        AssaultTacticalSquad => "突击战术分队",
        FortressTacticalSquad => "堡垒战术分队",
        RangedTacticalSquad => "远程战术分队",
        DestructiveTacticalSquad => "破坏战术分队",
        ResearchSquad => "研究分队",
        HighSpecSquad => "高规格分队",
        /// Raises the node refresh allowance.
        BlueprintSurveyingSquad => "蓝图测绘分队",
        AdaptiveSquad => "因地制宜分队",
        SoulEscortSquad => "魂灵护送分队",
    }
}

labelled_enum! {
    /// Starting collectible picked at the beginning of a run.
    pub enum Collectible {
        /// Every collection owned at settlement is worth extra points.
        DoodleInTheEraOfHope => "希望时代的涂鸦",
        /// Refreshed emergency operations are worth less.
        HatredInTheEraOfDeathFeud => "死仇时代的恨意",
        ScarInTheEraOfStruggle => "奋争时代的伤痕",
        LetterInTheEraOfExile => "流亡时代的书信",
        EchoInTheEraOfKings => "诸王时代的回响",
    }
}

labelled_enum! {
    /// The "king" collectible set. Owning several of them costs points.
    pub enum KingsCollectible {
        KingsCrown => "诸王的冠冕",
        KingsNewGun => "国王的新枪",
        KingsArmor => "国王的铠甲",
        KingsExtension => "国王的延伸",
    }
}

labelled_enum! {
    /// Operators whose absence from the run earns a fixed bonus.
    pub enum BannedOperator {
        Logos => "逻各斯",
        Wisadel => "维什戴尔",
        Ling => "令",
        Mlynar => "玛恩纳",
        Muelsyse => "缪尔赛思",
        Surtr => "史尔特尔",
        KirinRYato => "麒麟R夜刀",
        Mountain => "山",
        SilenceTheParadigmatic => "淬羽赫默",
        ReedTheFlameShadow => "焰影苇草",
    }
}

labelled_enum! {
    /// Map floor an emergency operation appears on.
    pub enum Level {
        Third => "第三层",
        Fourth => "第四层",
        Fifth => "第五层",
        Sixth => "第六层",
    }
}

labelled_enum! {
    pub enum EmergencyOperation {
        AGreatGame => "好一场大戏",
        WitchHunt => "猎巫",
        UnrulyCrowd => "失控的人群",
        CrumblingRampart => "倾颓的城墙",
        FrozenSilence => "冰封的沉默",
        ForgedOath => "伪造的誓言",
        HuntersAndPrey => "猎人与猎物",
        BurningLedger => "燃烧的账簿",
        ChorusOfTheDead => "亡者合唱",
        IronTide => "铁潮",
        SleeplessNight => "不眠之夜",
        TheLastBanquet => "最后的宴会",
        ThroneOfAsh => "灰烬王座",
    }
}

labelled_enum! {
    pub enum HiddenOperation {
        DuckHighway => "鸭速公路",
        GoldenTrove => "黄金宝库",
        TearfulRunaway => "流泪的逃亡者",
        LostCaravan => "迷途商队",
        MirrorMaze => "镜中迷宫",
    }
}

labelled_enum! {
    pub enum BossOperation {
        Audience => "观众",
        CivitasSancta => "神圣之城",
        TheWitchKing => "巫王",
        EndlessNightmare => "无终的梦魇",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyOperationInfo {
    pub score: u32,
    pub level: Level,
}

/// A zero score means the operation cannot be played in that variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenOperationInfo {
    pub score: u32,
    pub emergency_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossOperationInfo {
    pub score: u32,
    pub chaos_score: u32,
}

impl EmergencyOperation {
    #[must_use]
    pub const fn info(self) -> EmergencyOperationInfo {
        let (score, level) = match self {
            Self::AGreatGame => (20, Level::Third),
            Self::WitchHunt => (20, Level::Third),
            Self::UnrulyCrowd => (25, Level::Third),
            Self::CrumblingRampart => (25, Level::Third),
            Self::FrozenSilence => (35, Level::Fourth),
            Self::ForgedOath => (35, Level::Fourth),
            Self::HuntersAndPrey => (40, Level::Fourth),
            Self::BurningLedger => (40, Level::Fourth),
            Self::ChorusOfTheDead => (60, Level::Fifth),
            Self::IronTide => (60, Level::Fifth),
            Self::SleeplessNight => (70, Level::Fifth),
            Self::TheLastBanquet => (90, Level::Sixth),
            Self::ThroneOfAsh => (100, Level::Sixth),
        };
        EmergencyOperationInfo { score, level }
    }

    /// Operations found on one floor, in catalog order.
    pub fn by_level(level: Level) -> impl Iterator<Item = Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |op| op.info().level == level)
    }
}

impl HiddenOperation {
    #[must_use]
    pub const fn info(self) -> HiddenOperationInfo {
        let (score, emergency_score) = match self {
            Self::DuckHighway => (30, 50),
            Self::GoldenTrove => (40, 60),
            Self::TearfulRunaway => (30, 0),
            Self::LostCaravan => (0, 80),
            Self::MirrorMaze => (50, 70),
        };
        HiddenOperationInfo {
            score,
            emergency_score,
        }
    }

    /// Whether the normal (`emergency == false`) or emergency variant exists.
    #[must_use]
    pub const fn can_record(self, emergency: bool) -> bool {
        let info = self.info();
        if emergency {
            info.emergency_score != 0
        } else {
            info.score != 0
        }
    }
}

impl BossOperation {
    #[must_use]
    pub const fn info(self) -> BossOperationInfo {
        let (score, chaos_score) = match self {
            Self::Audience => (60, 90),
            Self::CivitasSancta => (100, 150),
            Self::TheWitchKing => (150, 250),
            Self::EndlessNightmare => (200, 300),
        };
        BossOperationInfo { score, chaos_score }
    }
}

impl BannedOperator {
    /// Points earned while this operator stays banned.
    #[must_use]
    pub const fn bonus(self) -> u32 {
        match self {
            Self::Logos | Self::Wisadel => 40,
            Self::Ling | Self::KirinRYato => 30,
            Self::Mlynar | Self::Muelsyse | Self::Surtr => 20,
            Self::Mountain | Self::SilenceTheParadigmatic | Self::ReedTheFlameShadow => 10,
        }
    }
}
