//! Static table of well-known Algorand Standard Assets
//!
//! Used to show a readable name and apply the asset's decimals to transfer
//! amounts. Unknown assets are shown by id with amounts in base units.

/// Known ASA metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetInfo {
    pub id: u64,
    pub unit: &'static str,
    pub name: &'static str,
    pub decimals: u8,
}

pub const KNOWN_ASSETS: &[AssetInfo] = &[
    AssetInfo {
        id: 312769,
        unit: "USDt",
        name: "Tether USDt",
        decimals: 6,
    },
    AssetInfo {
        id: 31566704,
        unit: "USDC",
        name: "USDC",
        decimals: 6,
    },
    AssetInfo {
        id: 386192725,
        unit: "goBTC",
        name: "goBTC",
        decimals: 8,
    },
    AssetInfo {
        id: 386195940,
        unit: "goETH",
        name: "goETH",
        decimals: 8,
    },
];

/// Look up an asset by id
pub fn find_asset(id: u64) -> Option<&'static AssetInfo> {
    KNOWN_ASSETS.iter().find(|asset| asset.id == id)
}
