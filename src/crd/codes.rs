//! # Enumerated Codes
//!
//! Closed enumerations used in resource specs. Each variant has a symbolic
//! name (what users write in YAML) and the numeric code UptimeRobot expects.
//! Unknown names never reach the operator: the CRD schema lists the allowed
//! values and deserialization rejects anything else.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {enumeration} '{name}'")]
pub struct UnknownVariant {
    pub enumeration: &'static str,
    pub name: String,
}

macro_rules! external_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = ($wire:literal, $code:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            schemars::JsonSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Numeric code sent to the UptimeRobot API
            #[must_use]
            pub const fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Symbolic name as written in resource specs
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        enumeration: stringify!($name),
                        name: s.to_string(),
                    })
            }
        }
    };
}

external_enum! {
    /// Type of monitor. `HTTP` and `HTTPS` are aliases of `HTTP_HTTPS` that
    /// additionally select the URL scheme for monitors derived from Ingresses.
    pub enum MonitorType {
        HttpHttps = ("HTTP_HTTPS", 1),
        Http = ("HTTP", 1),
        Https = ("HTTPS", 1),
        Keyword = ("KEYWORD", 2),
        Ping = ("PING", 3),
        Port = ("PORT", 4),
        Heartbeat = ("HEARTBEAT", 5),
    }
}

external_enum! {
    /// Sub type of a port monitor
    pub enum MonitorSubType {
        Http = ("HTTP", 1),
        Https = ("HTTPS", 2),
        Ftp = ("FTP", 3),
        Smtp = ("SMTP", 4),
        Pop3 = ("POP3", 5),
        Imap = ("IMAP", 6),
        Custom = ("CUSTOM", 99),
    }
}

external_enum! {
    pub enum MonitorHttpMethod {
        Head = ("HEAD", 1),
        Get = ("GET", 2),
        Post = ("POST", 3),
        Put = ("PUT", 4),
        Patch = ("PATCH", 5),
        Delete = ("DELETE", 6),
        Options = ("OPTIONS", 7),
    }
}

external_enum! {
    pub enum MonitorKeywordType {
        Exists = ("EXISTS", 1),
        NotExists = ("NOT_EXISTS", 2),
    }
}

external_enum! {
    pub enum MonitorHttpAuthType {
        BasicAuth = ("BASIC_AUTH", 1),
        Digest = ("DIGEST", 2),
    }
}

external_enum! {
    pub enum MonitorPostType {
        KeyValue = ("KEY_VALUE", 1),
        Raw = ("RAW", 2),
    }
}

external_enum! {
    pub enum MonitorPostContentType {
        TextHtml = ("TEXT_HTML", 0),
        ApplicationJson = ("APPLICATION_JSON", 1),
    }
}

external_enum! {
    pub enum AlertContactType {
        Sms = ("SMS", 1),
        Email = ("EMAIL", 2),
        TwitterDm = ("TWITTER_DM", 3),
        Boxcar = ("BOXCAR", 4),
        WebHook = ("WEB_HOOK", 5),
        Pushbullet = ("PUSHBULLET", 6),
        Zapier = ("ZAPIER", 7),
        Pushover = ("PUSHOVER", 9),
        Hipchat = ("HIPCHAT", 10),
        Slack = ("SLACK", 11),
    }
}

external_enum! {
    pub enum MaintenanceWindowType {
        Once = ("ONCE", 1),
        Daily = ("DAILY", 2),
        Weekly = ("WEEKLY", 3),
        Monthly = ("MONTHLY", 4),
    }
}

external_enum! {
    pub enum StatusPageSort {
        FriendlyNameAZ = ("FRIENDLY_NAME_A_Z", 1),
        FriendlyNameZA = ("FRIENDLY_NAME_Z_A", 2),
        StatusUpDownPaused = ("STATUS_UP_DOWN_PAUSED", 3),
        StatusDownUpPaused = ("STATUS_DOWN_UP_PAUSED", 4),
    }
}

external_enum! {
    pub enum StatusPageStatus {
        Paused = ("PAUSED", 0),
        Active = ("ACTIVE", 1),
    }
}
