//! Address-token extraction.
//!
//! Addresses follow the mainland convention of prefix-ordered components:
//! `省/自治区 → 市 → 区/县 → street detail`, with the four municipalities
//! (直辖市) acting as their own province.  Extraction is deliberately
//! token-based rather than a gazetteer lookup — the planner only needs the
//! city token (for the same-city decision) and the district (for last-mile
//! hub grouping), and tolerates suffix variants via substring containment.

/// Municipalities that act as their own province and city.
const MUNICIPALITIES: [&str; 4] = ["北京", "上海", "天津", "重庆"];

/// Characters that terminate a city/prefecture token.
const CITY_MARKERS: [char; 4] = ['市', '区', '县', '州'];

/// Province (or equivalent) of an address, including its suffix,
/// e.g. `"湖北省"`, `"北京市"`.
pub fn province_of(address: &str) -> Option<String> {
    for m in MUNICIPALITIES {
        if address.starts_with(m) {
            return Some(format!("{m}市"));
        }
    }
    if let Some(i) = address.find('省') {
        // Guard against a stray 省 deep in the street detail.
        if i <= 12 {
            return Some(address[..i + '省'.len_utf8()].to_string());
        }
    }
    if let Some(i) = address.find("自治区") {
        if i <= 15 {
            return Some(address[..i + "自治区".len()].to_string());
        }
    }
    None
}

/// Bare city/prefecture token of an address, without its `市` suffix,
/// e.g. `"武汉市洪山区…"` → `"武汉"`, `"北京市朝阳区…"` → `"北京"`.
pub fn city_token(address: &str) -> Option<String> {
    for m in MUNICIPALITIES {
        if address.starts_with(m) {
            return Some(m.to_string());
        }
    }

    let rest = strip_province(address);
    let token: String = rest.chars().take_while(|c| !CITY_MARKERS.contains(c)).collect();
    if token.is_empty() || token.len() == rest.len() {
        // No marker found — the address carries no recognisable city token.
        return None;
    }
    Some(token)
}

/// `true` iff the two addresses resolve to the same city.
///
/// Substring containment rather than equality tolerates suffix variants
/// ("吉林" vs "吉林市" both reduce near the same token).
pub fn same_city(a: &str, b: &str) -> bool {
    match (city_token(a), city_token(b)) {
        (Some(ca), Some(cb)) if !ca.is_empty() && !cb.is_empty() => {
            ca.contains(&cb) || cb.contains(&ca)
        }
        _ => false,
    }
}

/// District-level token including its suffix, e.g. `"洪山区"`.
pub fn district_of(address: &str) -> Option<String> {
    let rest = strip_city(address)?;
    let mut token = String::new();
    for c in rest.chars() {
        token.push(c);
        if c == '区' || c == '县' {
            return Some(token);
        }
        // Districts are short; anything longer is street detail.
        if token.chars().count() > 8 {
            break;
        }
    }
    None
}

/// The locality-level aggregation point a shipment is batched under,
/// e.g. `"武汉市洪山区"`.
///
/// District tokens alone collide across cities (朝阳区 exists in both
/// Beijing and Changchun), so the key is the city + district
/// concatenation.
pub fn district_hub_of(address: &str) -> Option<String> {
    let city = city_token(address)?;
    let district = district_of(address)?;
    Some(format!("{city}市{district}"))
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// Remainder of the address after the province prefix, if any.
fn strip_province(address: &str) -> &str {
    if let Some(i) = address.find('省') {
        if i <= 12 {
            return &address[i + '省'.len_utf8()..];
        }
    }
    if let Some(i) = address.find("自治区") {
        if i <= 15 {
            return &address[i + "自治区".len()..];
        }
    }
    address
}

/// Remainder of the address after the city token (and its `市` suffix).
fn strip_city(address: &str) -> Option<&str> {
    for m in MUNICIPALITIES {
        if let Some(rest) = address.strip_prefix(m) {
            return Some(rest.strip_prefix('市').unwrap_or(rest));
        }
    }
    let rest = strip_province(address);
    let i = rest.find('市')?;
    Some(&rest[i + '市'.len_utf8()..])
}
