// Content API payloads: static hotel, destination and type catalogs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audit::AuditData;
use crate::encoding::{CommaList, Date, Distance, Order};
use crate::phone::parse_e164;
use crate::transport::QueryParams;
use crate::validation::{check_optional_range, check_required, Validate, ValidationFault};

pub const MIN_FROM: i64 = 1;
pub const MIN_TO: i64 = 1;
pub const MAX_TO: i64 = 1000;

/// Localised text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Content {
    pub content: String,
    pub language_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncludeHotels {
    #[serde(rename = "webOnly")]
    WebOnly,
    #[serde(rename = "notOnSale")]
    NotOnSale,
}

impl IncludeHotels {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludeHotels::WebOnly => "webOnly",
            IncludeHotels::NotOnSale => "notOnSale",
        }
    }
}

impl fmt::Display for IncludeHotels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhoneType {
    #[serde(rename = "PHONEHOTEL")]
    Hotel,
    #[serde(rename = "PHONEBOOKING")]
    Booking,
    #[serde(rename = "FAXNUMBER")]
    Fax,
    #[serde(rename = "PHONEMANAGEMENT")]
    Management,
    #[default]
    #[serde(other)]
    Other,
}

fn push_paging(
    pairs: &mut Vec<(&'static str, String)>,
    from: Option<u32>,
    to: Option<u32>,
) {
    if let Some(from) = from {
        pairs.push(("from", from.to_string()));
    }
    if let Some(to) = to {
        pairs.push(("to", to.to_string()));
    }
}

fn validate_paging(from: Option<u32>, to: Option<u32>) -> Result<(), ValidationFault> {
    check_optional_range("From", from.map(i64::from), MIN_FROM, i64::MAX)?;
    check_optional_range("To", to.map(i64::from), MIN_TO, MAX_TO)
}

fn flag(value: bool) -> String {
    value.to_string()
}

// ---------------------------------------------------------------------------
// Hotels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListHotelsInput {
    /// Restrict to these hotel codes.
    pub codes: CommaList<i64>,
    pub country_code: String,
    pub destination_code: String,
    /// Also list web-only or not-on-sale hotels.
    pub include_hotels: Option<IncludeHotels>,
    /// Response fields, `all` for everything. Empty returns the default set.
    pub fields: CommaList<String>,
    pub language: String,
    /// First record, 1 when unset.
    pub from: Option<u32>,
    /// Last record, 100 when unset, at most 1000.
    pub to: Option<u32>,
    /// Fall back to English where the requested language is missing.
    pub use_secondary_language: Option<bool>,
    /// Only hotels changed after this date.
    pub last_update_time: Date,
    /// Only hotels with at least one PMS room code.
    pub pms_room_code: Option<bool>,
}

impl Validate for ListHotelsInput {
    fn validate(&self) -> Result<(), ValidationFault> {
        validate_paging(self.from, self.to)
    }
}

impl QueryParams for ListHotelsInput {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.codes.is_empty() {
            pairs.push(("codes", self.codes.joined()));
        }
        if !self.country_code.is_empty() {
            pairs.push(("countryCode", self.country_code.clone()));
        }
        if !self.destination_code.is_empty() {
            pairs.push(("destinationCode", self.destination_code.clone()));
        }
        if let Some(include) = self.include_hotels {
            pairs.push(("includeHotels", include.to_string()));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.joined()));
        }
        if !self.language.is_empty() {
            pairs.push(("language", self.language.clone()));
        }
        push_paging(&mut pairs, self.from, self.to);
        if let Some(secondary) = self.use_secondary_language {
            pairs.push(("useSecondaryLanguage", flag(secondary)));
        }
        if !self.last_update_time.is_unset() {
            pairs.push(("lastUpdateTime", self.last_update_time.to_string()));
        }
        if let Some(pms) = self.pms_room_code {
            pairs.push(("PMSRoomCode", flag(pms)));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListHotelsResponse {
    pub from: i64,
    pub to: i64,
    pub total: i64,
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    pub hotels: Vec<Hotel>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetHotelDetailsInput {
    pub language: String,
    pub use_secondary_language: Option<bool>,
}

impl QueryParams for GetHotelDetailsInput {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.language.is_empty() {
            pairs.push(("language", self.language.clone()));
        }
        if let Some(secondary) = self.use_secondary_language {
            pairs.push(("useSecondaryLanguage", flag(secondary)));
        }
        pairs
    }
}

/// Path segment for the details endpoint, e.g. `6613,6619`.
pub(crate) fn hotel_codes_segment(codes: &[i64]) -> Result<String, ValidationFault> {
    check_required("Codes", !codes.is_empty())?;
    Ok(CommaList(codes.to_vec()).joined())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetHotelDetailsResponse {
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    pub hotels: Vec<Hotel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hotel {
    pub code: i64,
    pub name: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Content>,
    pub country_code: String,
    pub state_code: String,
    pub destination_code: String,
    pub zone_code: i64,
    pub coordinates: Coordinates,
    pub category_code: String,
    pub category_group_code: String,
    pub chain_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation_type: Option<HotelAccommodation>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub accommodation_type_code: String,
    pub board_codes: Vec<String>,
    pub segment_codes: Vec<i64>,
    pub address: Address,
    pub postal_code: String,
    pub city: Content,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(rename = "web")]
    pub url: String,
    pub last_update: Date,
    #[serde(rename = "S2C")]
    pub s2c: String,
    pub ranking: i64,
    pub phones: Vec<Phone>,
    pub rooms: Vec<HotelRoom>,
    pub facilities: Vec<Facility>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terminals: Vec<Terminal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interest_points: Vec<InterestPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(rename = "wildcards", skip_serializing_if = "Vec::is_empty")]
    pub wild_cards: Vec<WildCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelAccommodation {
    pub code: String,
    #[serde(rename = "typeDescription")]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub content: String,
    pub street: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phone {
    #[serde(rename = "phoneNumber")]
    pub number: String,
    #[serde(rename = "phoneType")]
    pub phone_type: PhoneType,
}

impl Phone {
    /// The number in E.164 form, if it can be normalised.
    pub fn e164(&self) -> Option<String> {
        parse_e164(&self.number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotelRoom {
    #[serde(rename = "roomCode")]
    pub code: String,
    pub is_parent_room: bool,
    pub min_pax: i64,
    pub max_pax: i64,
    pub min_adults: i64,
    pub max_adults: i64,
    pub min_children: i64,
    pub max_children: i64,
    #[serde(rename = "roomType")]
    pub room_type: String,
    pub characteristic_code: String,
    #[serde(rename = "roomFacilities")]
    pub facilities: Vec<HotelRoomFacility>,
    #[serde(rename = "roomStays", skip_serializing_if = "Vec::is_empty")]
    pub stays: Vec<HotelRoomStay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelRoomFacility {
    #[serde(rename = "facilityCode")]
    pub code: i64,
    #[serde(rename = "facilityGroupCode")]
    pub group_code: i64,
    #[serde(rename = "indLogic")]
    pub ind_logic: bool,
    pub number: i64,
    pub voucher: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelRoomStay {
    #[serde(rename = "stayType")]
    pub stay_type: String,
    pub order: Order,
    pub description: String,
    #[serde(rename = "roomStayFacilities")]
    pub facilities: Vec<HotelRoomFacility>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Terminal {
    #[serde(rename = "terminalCode")]
    pub code: String,
    pub distance: Distance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    #[serde(rename = "issueCode")]
    pub code: String,
    #[serde(rename = "issueType")]
    pub issue_type: String,
    #[serde(rename = "dateFrom")]
    pub from: Date,
    #[serde(rename = "dateTo")]
    pub to: Date,
    pub order: Order,
    #[serde(rename = "alternative")]
    pub is_alternative: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterestPoint {
    pub facility_code: i64,
    pub facility_group_code: i64,
    pub order: Order,
    #[serde(rename = "poiName")]
    pub name: String,
    pub distance: Distance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facility {
    #[serde(rename = "facilityCode")]
    pub code: i64,
    #[serde(rename = "facilityGroupCode")]
    pub group_code: i64,
    pub order: Order,
    #[serde(rename = "indLogic")]
    pub ind_logic: bool,
    #[serde(rename = "indFee")]
    pub ind_fee: bool,
    pub number: i64,
    pub voucher: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "imageTypeCode")]
    pub type_code: String,
    pub path: String,
    pub order: Order,
    pub visual_order: i64,
    pub room_code: String,
    pub room_type: String,
    pub characteristic_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WildCard {
    pub room_type: String,
    pub room_code: String,
    pub characteristic_code: String,
    #[serde(rename = "hotelRoomDescription")]
    pub description: Content,
}

// ---------------------------------------------------------------------------
// Type and location catalogs
// ---------------------------------------------------------------------------

/// Pagination and language options shared by the catalog endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListInput {
    pub fields: CommaList<String>,
    pub language: String,
    pub from: Option<u32>,
    pub to: Option<u32>,
    pub use_secondary_language: Option<bool>,
    pub last_update_time: Date,
}

impl ListInput {
    pub fn page(from: u32, to: u32) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }
}

impl Validate for ListInput {
    fn validate(&self) -> Result<(), ValidationFault> {
        validate_paging(self.from, self.to)
    }
}

impl QueryParams for ListInput {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.joined()));
        }
        if !self.language.is_empty() {
            pairs.push(("language", self.language.clone()));
        }
        push_paging(&mut pairs, self.from, self.to);
        if let Some(secondary) = self.use_secondary_language {
            pairs.push(("useSecondaryLanguage", flag(secondary)));
        }
        if !self.last_update_time.is_unset() {
            pairs.push(("lastUpdateTime", self.last_update_time.to_string()));
        }
        pairs
    }
}

pub type ListAccommodationsInput = ListInput;
pub type ListDestinationsInput = ListInput;
pub type ListFacilitiesInput = ListInput;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListAccommodationsResponse {
    pub from: i64,
    pub to: i64,
    pub total: i64,
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    pub accommodations: Vec<Accommodation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Accommodation {
    pub code: String,
    pub type_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_multi_description: Option<Content>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListDestinationsResponse {
    pub from: i64,
    pub to: i64,
    pub total: i64,
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Destination {
    pub code: String,
    pub name: Content,
    pub country_code: String,
    pub iso_code: String,
    pub zones: Vec<Zone>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_zones: Vec<GroupZone>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Zone {
    pub zone_code: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Content>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupZone {
    pub group_zone_code: String,
    pub name: Content,
    pub zones: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFacilitiesResponse {
    pub from: i64,
    pub to: i64,
    pub total: i64,
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    pub facilities: Vec<FacilityType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacilityType {
    pub code: i64,
    pub facility_group_code: i64,
    pub facility_typology_code: i64,
    pub description: Content,
}
