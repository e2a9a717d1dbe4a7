//! Ad platform table.

/// Which family of cost-per-click benchmarks a platform bills against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpcChannel {
    Meta,
    Google,
}

/// An ad platform/surface and the optional metrics it reports.
///
/// Capability flags belong to the platform, never to an individual scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub cpc_channel: CpcChannel,
    /// Reports audience reach and frequency.
    pub reports_reach: bool,
    /// Reports auction impression share.
    pub reports_impression_share: bool,
    /// Reports top-of-page rate.
    pub reports_top_of_page: bool,
}

pub const PLATFORMS: &[PlatformProfile] = &[
    PlatformProfile {
        key: "meta",
        name: "Meta Ads",
        cpc_channel: CpcChannel::Meta,
        reports_reach: true,
        reports_impression_share: false,
        reports_top_of_page: false,
    },
    PlatformProfile {
        key: "google_search",
        name: "Google Ads (Search)",
        cpc_channel: CpcChannel::Google,
        reports_reach: false,
        reports_impression_share: true,
        reports_top_of_page: true,
    },
    PlatformProfile {
        key: "google_shopping",
        name: "Google Ads (Shopping)",
        cpc_channel: CpcChannel::Google,
        reports_reach: false,
        reports_impression_share: true,
        reports_top_of_page: false,
    },
];
