// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed enumeration stored under its display label.
///
/// `FromStr` accepts either the label or the ASCII slug; deserialisation is
/// lenient and maps unknown labels to the fallback variant.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (fallback $fallback:ident) {
            $($variant:ident => ($label:literal, $slug:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn slug(self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }

            pub fn from_label_lenient(s: &str) -> Self {
                s.parse().unwrap_or($name::$fallback)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> anyhow::Result<Self> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == s || v.slug().eq_ignore_ascii_case(s))
                    .ok_or_else(|| anyhow::anyhow!("Unknown {} '{}'", stringify!($name), s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
                ser.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(de)?;
                Ok($name::from_label_lenient(&raw))
            }
        }
    };
}

labelled_enum! {
    /// Payment rail a transaction was captured from.
    pub enum Platform (fallback Other) {
        WeChat => ("微信支付", "wechat"),
        Alipay => ("支付宝", "alipay"),
        Bank => ("银行卡", "bank"),
        Cash => ("现金", "cash"),
        ApplePay => ("Apple Pay", "applepay"),
        Douyin => ("抖音支付", "douyin"),
        Meituan => ("美团", "meituan"),
        JD => ("京东", "jd"),
        Taobao => ("淘宝/天猫", "taobao"),
        Pinduoduo => ("拼多多", "pinduoduo"),
        Other => ("其他", "other"),
    }
}

labelled_enum! {
    pub enum Category (fallback Other) {
        Food => ("餐饮", "food"),
        Transport => ("交通", "transport"),
        Clothing => ("服饰", "clothing"),
        HobbiesTravel => ("爱好&旅行", "hobbies"),
        Education => ("教育", "education"),
        Social => ("人情", "social"),
        Elders => ("长辈", "elders"),
        Medical => ("医疗", "medical"),
        InvestmentLoss => ("投资亏损", "investment-loss"),
        Services => ("生活服务", "services"),
        DailySupplies => ("日用品", "daily"),
        Other => ("其他", "other"),
    }
}

labelled_enum! {
    /// On whose behalf the money was spent.
    pub enum ConsumptionObject (fallback Others) {
        Myself => ("自己", "self"),
        Parents => ("父母", "parents"),
        Spouse => ("丈夫", "spouse"),
        Child => ("女儿", "child"),
        Friends => ("朋友", "friends"),
        Others => ("其他人", "others"),
    }
}

impl Default for ConsumptionObject {
    fn default() -> Self {
        ConsumptionObject::Myself
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: String, // YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>, // HH:mm, display only
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub description: String,
    pub platform: Platform,
    pub category: Category,
    #[serde(default)]
    pub consumption_object: ConsumptionObject,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_image: Option<String>,
}

impl Transaction {
    /// Description when the extractor produced one, merchant otherwise.
    pub fn label(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.merchant
        } else {
            &self.description
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal, // monthly
}
