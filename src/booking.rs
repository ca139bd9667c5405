// Booking API payloads: availability, rate checks and the booking lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audit::AuditData;
use crate::encoding::{CommaList, Coordinate, Date, FloatRate, Money, Radius, TimestampTz, Unit};
use crate::transport::QueryParams;
use crate::validation::{
    check_allowed, check_max_len, check_optional_range, check_range, check_required, Validate,
    ValidationFault,
};

pub const MAX_SHIFT_DAYS: i64 = 5;
pub const MAX_RADIUS: i64 = 200;
pub const MAX_HOTEL_CODES: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Whether a change or cancellation is simulated or applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Update,
    Cancellation,
    Simulation,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Update => "UPDATE",
            Mode::Cancellation => "CANCELLATION",
            Mode::Simulation => "SIMULATION",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaxType {
    #[serde(rename = "AD")]
    Adult,
    #[serde(rename = "CH")]
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    AtWeb,
    AtHotel,
    #[default]
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAvailableHotelsInput {
    pub stay: Stay,
    pub occupancies: Vec<Occupancy>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<Keyword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<Geolocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boards: Option<FilterBoards>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<FilterRooms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotels: Option<FilterHotel>,
    /// Price breakdown per day of the stay.
    #[serde(rename = "dailyRate")]
    pub daily_rate: bool,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub source_market: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<i64>,
    /// Response language, English when empty.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub language: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub accommodations: Vec<String>,
}

impl Validate for ListAvailableHotelsInput {
    fn validate(&self) -> Result<(), ValidationFault> {
        self.stay.validate()?;
        self.geolocation.validate()?;
        self.filter.validate()?;
        self.hotels.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub check_in: Date,
    pub check_out: Date,
    /// Days before and after check-in to search, keeping the stay length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_only_shift: Option<bool>,
}

impl Stay {
    pub fn new(check_in: Date, check_out: Date) -> Self {
        Self {
            check_in,
            check_out,
            ..Default::default()
        }
    }
}

impl Validate for Stay {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_optional_range(
            "ShiftDays",
            self.shift_days.map(i64::from),
            0,
            MAX_SHIFT_DAYS,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupancy {
    pub rooms: u32,
    pub adults: u32,
    pub children: u32,
    /// Only needed when children are present.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub paxes: Vec<Pax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pax {
    #[serde(rename = "type")]
    pub pax_type: PaxType,
    #[serde(default)]
    pub age: u32,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub room_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<i64>,
    pub all_included: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Radius,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit: Option<Unit>,
}

impl Validate for Geolocation {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_required("Latitude", self.latitude != 0.0)?;
        check_required("Longitude", self.longitude != 0.0)?;
        check_range("Radius", i64::from(self.radius.value()), 0, MAX_RADIUS)?;
        match &self.unit {
            Some(unit) => check_allowed("Unit", unit.as_str(), &Unit::ALLOWED),
            None => Ok(()),
        }
    }
}

/// Result filters. Unset fields are not sent and not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hotels: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rate: Option<FloatRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rate: Option<FloatRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rates_per_room: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_category: Option<i64>,
}

impl Validate for Filter {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_optional_range("MaxHotels", self.max_hotels, 1, 2000)?;
        check_optional_range("MaxRooms", self.max_rooms, 1, 50)?;
        check_optional_range("MaxRatesPerRoom", self.max_rates_per_room, 1, 50)?;
        check_optional_range("MinCategory", self.min_category, 1, 5)?;
        check_optional_range("MaxCategory", self.max_category, 1, 5)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterBoards {
    #[serde(rename = "board")]
    pub boards: Vec<String>,
    pub included: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRooms {
    #[serde(rename = "room")]
    pub codes: Vec<String>,
    pub included: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterHotel {
    #[serde(rename = "hotel")]
    pub hotel_codes: Vec<i64>,
}

impl Validate for FilterHotel {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_max_len("FilterHotel.Hotel", self.hotel_codes.len(), MAX_HOTEL_CODES)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListAvailableHotelsResponse {
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    pub hotels: AvailableHotels,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvailableHotels {
    pub check_in: Date,
    pub check_out: Date,
    pub total: i64,
    pub hotels: Vec<AvailableHotel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvailableHotel {
    pub code: i64,
    pub name: String,
    pub category_code: String,
    pub category_name: String,
    pub destination_code: String,
    pub destination_name: String,
    pub zone_code: i64,
    pub zone_name: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub rooms: Vec<AvailableHotelRoom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rate: Option<FloatRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rate: Option<FloatRate>,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailableHotelRoom {
    pub code: String,
    pub name: String,
    pub rates: Vec<Rate>,
}

/// A bookable price for one room, board and occupancy combination.
/// Availability, rate checks and bookings all return this shape; the optional
/// parts are only filled by the operations that produce them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rate {
    pub rate_key: String,
    pub rate_class: String,
    pub rate_type: String,
    pub net: Money,
    pub selling_rate: Money,
    pub allotment: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rate_comments_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rate_comments: String,
    pub payment_type: PaymentType,
    pub packaging: bool,
    pub board_code: String,
    pub board_name: String,
    pub cancellation_policies: Vec<CancellationPolicy>,
    pub rooms: u32,
    pub adults: u32,
    pub children: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offers: Vec<Offer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shift_rates: Vec<ShiftRate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub daily_rates: Vec<DailyRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxes: Option<Taxes>,
    #[serde(rename = "rateBreakDown", skip_serializing_if = "Option::is_none")]
    pub rate_breakdown: Option<RateBreakdown>,
}

/// Same stay moved by up to `shiftDays` days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShiftRate {
    pub rate_key: String,
    pub rate_class: String,
    pub rate_type: String,
    pub net: Money,
    pub selling_rate: Money,
    pub allotment: i64,
    pub check_in: Date,
    pub check_out: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationPolicy {
    pub amount: Money,
    pub from: TimestampTz,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offer {
    pub code: String,
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyRate {
    /// Day of the stay this price applies to.
    pub offset: i64,
    pub net: Money,
    pub selling: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Taxes {
    pub taxes: Vec<Tax>,
    pub all_included: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tax {
    pub included: bool,
    pub amount: Money,
    pub currency: String,
    pub client_amount: Money,
    pub client_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateBreakdown {
    #[serde(rename = "rateDiscounts")]
    pub discounts: Vec<Discount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Discount {
    pub code: String,
    pub name: String,
    pub amount: Money,
}

// ---------------------------------------------------------------------------
// Rate checks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRatesInput {
    /// Adds the upselling options node to the response.
    pub upselling: bool,
    /// Adds percent or number of nights to cancellation policies.
    #[serde(rename = "expandCXL")]
    pub expand_cxl: bool,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub language: String,
    pub rooms: Vec<CheckRatesRoom>,
}

impl Validate for CheckRatesInput {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_required("Rooms", !self.rooms.is_empty())?;
        self.rooms
            .iter()
            .try_for_each(|room| check_required("Rooms.RateKey", !room.rate_key.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRatesRoom {
    /// Returned by availability; identifies room, board and occupancy.
    pub rate_key: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub paxes: Vec<Pax>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckRatesResponse {
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel: Option<CheckRateHotel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckRateHotel {
    pub code: i64,
    pub name: String,
    pub category_code: String,
    pub category_name: String,
    pub destination_code: String,
    pub destination_name: String,
    pub zone_code: i64,
    pub zone_name: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub rooms: Vec<AvailableHotelRoom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rate: Option<FloatRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rate: Option<FloatRate>,
    pub currency: String,
    pub check_in: Date,
    pub check_out: Date,
    pub total_net: Money,
    pub payment_data_required: bool,
    pub modification_policies: ModificationPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModificationPolicy {
    #[serde(rename = "cancellation")]
    pub cancellation_allowed: bool,
    #[serde(rename = "modification")]
    pub modification_allowed: bool,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingInput {
    pub holder: Holder,
    #[serde(rename = "paymentData", skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentData>,
    /// Internal booking reference.
    pub client_reference: String,
    /// Agent name, defaults upstream to the API key owner.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub creation_user: String,
    /// Free text forwarded to the hotelier.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub remark: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher: Option<Voucher>,
    /// Accepted price difference in percent, two decimals at most.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Money>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub language: String,
    pub rooms: Vec<ConfirmBookingRoom>,
}

impl Validate for ConfirmBookingInput {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_required("Holder.Name", !self.holder.name.is_empty())?;
        check_required("Holder.Surname", !self.holder.surname.is_empty())?;
        check_required("ClientReference", !self.client_reference.is_empty())?;
        check_required("Rooms", !self.rooms.is_empty())?;
        self.rooms
            .iter()
            .try_for_each(|room| check_required("Rooms.RateKey", !room.rate_key.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingRoom {
    pub rate_key: String,
    pub paxes: Vec<Pax>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Holder {
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    #[serde(rename = "paymentCard")]
    pub card: PaymentCard,
    #[serde(rename = "contactData")]
    pub contact: ContactData,
    #[serde(rename = "billingAddress", skip_serializing_if = "Option::is_none")]
    pub billing: Option<BillingAddress>,
    #[serde(rename = "threeDsData", skip_serializing_if = "Option::is_none")]
    pub three_ds: Option<ThreeDsData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_partner: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCard {
    #[serde(rename = "cardType")]
    pub card_type: String,
    #[serde(rename = "cardNumber")]
    pub number: String,
    #[serde(rename = "expiryDate")]
    pub expiry: String,
    #[serde(rename = "cardCVC")]
    pub cvc: String,
}

impl fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_four = self
            .number
            .char_indices()
            .rev()
            .nth(3)
            .map_or("", |(i, _)| &self.number[i..]);
        f.debug_struct("PaymentCard")
            .field("card_type", &self.card_type)
            .field("number", &format_args!("****{}", last_four))
            .field("expiry", &self.expiry)
            .field("cvc", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactData {
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDsData {
    /// `PROVIDED` when authenticated through your own PSP, else `REQUESTED`.
    pub option: String,
    pub version: String,
    pub info_provided: ThreeDsInfoProvided,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDsInfoProvided {
    pub id: String,
    pub cavv: String,
    pub eci: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub ip: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub language: String,
    pub email: VoucherEmail,
    /// Logo path; PNG, JPG, GIF or BMP up to 100x100px.
    pub logo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherEmail {
    pub to: String,
    pub from: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingResponse {
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
}

pub type ConfirmBookingResponse = BookingResponse;
pub type GetBookingResponse = BookingResponse;
pub type ChangeBookingResponse = BookingResponse;
pub type CancelBookingResponse = BookingResponse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Booking {
    pub reference: String,
    pub cancellation_reference: String,
    pub client_reference: String,
    pub creation_date: Date,
    pub creation_user: String,
    pub status: BookingStatus,
    #[serde(rename = "modificationPolicies")]
    pub modification_policy: ModificationPolicy,
    #[serde(rename = "agComission")]
    pub agency_commission: String,
    #[serde(rename = "comissionVAT")]
    pub commission_vat: String,
    pub holder: Holder,
    pub remark: String,
    pub invoice_company: InvoiceCompany,
    pub total_selling_rate: Money,
    pub total_net: Money,
    pub pending_amount: Money,
    pub currency: String,
    pub hotel: BookingHotel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingHotel {
    pub code: i64,
    pub name: String,
    pub category_code: String,
    pub category_name: String,
    pub destination_code: String,
    pub destination_name: String,
    pub zone_code: i64,
    pub zone_name: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub check_in: Date,
    pub check_out: Date,
    pub total_selling_rate: Money,
    pub total_net: Money,
    pub pending_amount: Money,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Supplier>,
    pub client_comments: String,
    pub cancellation_amount: Money,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub upselling: Vec<UpsellingRate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<Keyword>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
    pub rooms: Vec<BookingRoom>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingRoom {
    pub code: String,
    pub name: String,
    pub status: BookingStatus,
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub supplier_reference: String,
    pub paxes: Vec<Pax>,
    pub rates: Vec<Rate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceCompany {
    pub registration_number: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Supplier {
    pub name: String,
    pub vat_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpsellingRate {
    pub rate_key: String,
    pub rate_class: String,
    pub rate_type: String,
    pub net: Money,
    pub selling_rate: Money,
    pub allotment: i64,
    pub payment_type: PaymentType,
    pub board_code: String,
    pub board_name: String,
    pub cancellation_policies: Vec<CancellationPolicy>,
    pub rooms: u32,
    pub adults: u32,
    pub children: u32,
    pub discount: String,
    #[serde(rename = "discountPCT")]
    pub discount_percent: String,
    pub hotel_mandatory: bool,
    #[serde(rename = "comission")]
    pub commission: Money,
    #[serde(rename = "comissionVAT")]
    pub commission_vat: String,
    #[serde(rename = "comissionPCT")]
    pub commission_percent: String,
    pub rateup: Money,
    pub brand: String,
    pub taxes: Vec<Tax>,
    pub daily_rates: Vec<DailyRate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub rate: String,
    #[serde(rename = "reviewCount")]
    pub count: i64,
    #[serde(rename = "type")]
    pub review_type: String,
}

/// Filters for the booking list. Empty fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListBookingsInput {
    pub from: Option<u32>,
    pub to: Option<u32>,
    pub filter_type: String,
    pub client_reference: String,
    pub creation_user: String,
    /// Hotel country codes.
    pub countries: CommaList<String>,
    pub destinations: CommaList<String>,
    pub hotels: CommaList<i64>,
    /// Start of the date range, omitted when unset.
    pub start: Date,
    pub end: Date,
}

impl Validate for ListBookingsInput {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_optional_range("From", self.from.map(i64::from), 1, i64::MAX)?;
        check_optional_range("To", self.to.map(i64::from), 1, 1000)
    }
}

impl QueryParams for ListBookingsInput {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }
        let strings = [
            ("filterType", &self.filter_type),
            ("clientReference", &self.client_reference),
            ("creationUser", &self.creation_user),
        ];
        for (key, value) in strings {
            if !value.is_empty() {
                pairs.push((key, value.clone()));
            }
        }
        if !self.countries.is_empty() {
            pairs.push(("country", self.countries.joined()));
        }
        if !self.destinations.is_empty() {
            pairs.push(("destination", self.destinations.joined()));
        }
        if !self.hotels.is_empty() {
            pairs.push(("hotel", self.hotels.joined()));
        }
        if !self.start.is_unset() {
            pairs.push(("start", self.start.to_string()));
        }
        if !self.end.is_unset() {
            pairs.push(("end", self.end.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBookingsResponse {
    #[serde(rename = "auditData", skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditData>,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBookingInput {
    pub mode: Mode,
    #[serde(rename = "paymentData", skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentData>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
}

/// Sent as the `cancellationFlag` and `language` query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelBookingInput {
    pub mode: Mode,
    pub language: String,
}

impl CancelBookingInput {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            language: String::new(),
        }
    }
}

impl Validate for CancelBookingInput {
    fn validate(&self) -> Result<(), ValidationFault> {
        check_allowed(
            "CancellationFlag",
            self.mode.as_str(),
            &["CANCELLATION", "SIMULATION"],
        )
    }
}

impl QueryParams for CancelBookingInput {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("cancellationFlag", self.mode.to_string())];
        if !self.language.is_empty() {
            pairs.push(("language", self.language.clone()));
        }
        pairs
    }
}

pub(crate) fn validate_booking_id(id: &str) -> Result<(), ValidationFault> {
    check_required("BookingID", !id.trim().is_empty())?;
    if id.contains('/') || id.contains('?') {
        return Err(ValidationFault::allowed("BookingID", ["reference without '/' or '?'"]));
    }
    Ok(())
}
