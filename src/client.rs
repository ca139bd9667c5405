// Typed client for the booking and content APIs

use async_trait::async_trait;
use std::sync::Arc;

use crate::booking::{
    validate_booking_id, CancelBookingInput, CancelBookingResponse, ChangeBookingInput,
    ChangeBookingResponse, CheckRatesInput, CheckRatesResponse, ConfirmBookingInput,
    ConfirmBookingResponse, GetBookingResponse, ListAvailableHotelsInput,
    ListAvailableHotelsResponse, ListBookingsInput, ListBookingsResponse,
};
use crate::config::ClientConfig;
use crate::content::{
    hotel_codes_segment, GetHotelDetailsInput, GetHotelDetailsResponse, ListAccommodationsInput,
    ListAccommodationsResponse, ListDestinationsInput, ListDestinationsResponse,
    ListFacilitiesInput, ListFacilitiesResponse, ListHotelsInput, ListHotelsResponse,
};
use crate::errors::{ApiError, ClientError};
use crate::transport::{ClientStats, RequestSpec, Transport};
use crate::validation::Validate;

const BOOKING_API: &str = "/hotel-api/1.0";
const BOOKING_API_V12: &str = "/hotel-api/1.2";
const CONTENT_API: &str = "/hotel-content-api/1.0";

#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Availability search.
    async fn list_available_hotels(
        &self,
        input: &ListAvailableHotelsInput,
    ) -> Result<ListAvailableHotelsResponse, ApiError>;

    /// Re-prices rate keys returned by availability.
    async fn check_rates(&self, input: &CheckRatesInput) -> Result<CheckRatesResponse, ApiError>;

    async fn confirm_booking(
        &self,
        input: &ConfirmBookingInput,
    ) -> Result<ConfirmBookingResponse, ApiError>;

    async fn get_booking(&self, id: &str) -> Result<GetBookingResponse, ApiError>;

    async fn list_bookings(
        &self,
        input: &ListBookingsInput,
    ) -> Result<ListBookingsResponse, ApiError>;

    async fn change_booking(
        &self,
        id: &str,
        input: &ChangeBookingInput,
    ) -> Result<ChangeBookingResponse, ApiError>;

    async fn cancel_booking(
        &self,
        id: &str,
        input: &CancelBookingInput,
    ) -> Result<CancelBookingResponse, ApiError>;
}

#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn list_hotels(&self, input: &ListHotelsInput) -> Result<ListHotelsResponse, ApiError>;

    async fn get_hotel_details(
        &self,
        codes: &[i64],
        input: &GetHotelDetailsInput,
    ) -> Result<GetHotelDetailsResponse, ApiError>;

    async fn list_accommodations(
        &self,
        input: &ListAccommodationsInput,
    ) -> Result<ListAccommodationsResponse, ApiError>;

    async fn list_destinations(
        &self,
        input: &ListDestinationsInput,
    ) -> Result<ListDestinationsResponse, ApiError>;

    async fn list_facilities(
        &self,
        input: &ListFacilitiesInput,
    ) -> Result<ListFacilitiesResponse, ApiError>;
}

/// Both API surfaces, for callers that want a single trait object.
pub trait HotelbedsApi: BookingApi + ContentApi {}

impl<T: BookingApi + ContentApi> HotelbedsApi for T {}

/// Cheap to clone; clones share the connection pool, rate limiter and stats.
#[derive(Clone)]
pub struct HotelbedsClient {
    transport: Arc<Transport>,
}

impl HotelbedsClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Arc::new(Transport::new(&config)?),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn stats(&self) -> ClientStats {
        self.transport.stats()
    }
}

#[async_trait]
impl BookingApi for HotelbedsClient {
    async fn list_available_hotels(
        &self,
        input: &ListAvailableHotelsInput,
    ) -> Result<ListAvailableHotelsResponse, ApiError> {
        input.validate()?;
        let spec = RequestSpec::post(format!("{}/hotels", BOOKING_API), input)?;
        self.transport.execute(spec).await
    }

    async fn check_rates(&self, input: &CheckRatesInput) -> Result<CheckRatesResponse, ApiError> {
        input.validate()?;
        let spec = RequestSpec::post(format!("{}/checkrates", BOOKING_API), input)?;
        self.transport.execute(spec).await
    }

    async fn confirm_booking(
        &self,
        input: &ConfirmBookingInput,
    ) -> Result<ConfirmBookingResponse, ApiError> {
        input.validate()?;
        let spec = RequestSpec::post(format!("{}/bookings", BOOKING_API_V12), input)?;
        self.transport.execute(spec).await
    }

    async fn get_booking(&self, id: &str) -> Result<GetBookingResponse, ApiError> {
        validate_booking_id(id)?;
        let spec = RequestSpec::get(format!("{}/bookings/{}", BOOKING_API, id));
        self.transport.execute(spec).await
    }

    async fn list_bookings(
        &self,
        input: &ListBookingsInput,
    ) -> Result<ListBookingsResponse, ApiError> {
        input.validate()?;
        let spec = RequestSpec::get(format!("{}/bookings", BOOKING_API)).with_query(input);
        self.transport.execute(spec).await
    }

    async fn change_booking(
        &self,
        id: &str,
        input: &ChangeBookingInput,
    ) -> Result<ChangeBookingResponse, ApiError> {
        validate_booking_id(id)?;
        let spec = RequestSpec::put(format!("{}/bookings/{}", BOOKING_API, id), input)?;
        self.transport.execute(spec).await
    }

    async fn cancel_booking(
        &self,
        id: &str,
        input: &CancelBookingInput,
    ) -> Result<CancelBookingResponse, ApiError> {
        validate_booking_id(id)?;
        input.validate()?;
        let spec =
            RequestSpec::delete(format!("{}/bookings/{}", BOOKING_API, id)).with_query(input);
        self.transport.execute(spec).await
    }
}

#[async_trait]
impl ContentApi for HotelbedsClient {
    async fn list_hotels(&self, input: &ListHotelsInput) -> Result<ListHotelsResponse, ApiError> {
        input.validate()?;
        let spec = RequestSpec::get(format!("{}/hotels", CONTENT_API)).with_query(input);
        self.transport.execute(spec).await
    }

    async fn get_hotel_details(
        &self,
        codes: &[i64],
        input: &GetHotelDetailsInput,
    ) -> Result<GetHotelDetailsResponse, ApiError> {
        let segment = hotel_codes_segment(codes)?;
        let spec = RequestSpec::get(format!("{}/hotels/{}/details", CONTENT_API, segment))
            .with_query(input);
        self.transport.execute(spec).await
    }

    async fn list_accommodations(
        &self,
        input: &ListAccommodationsInput,
    ) -> Result<ListAccommodationsResponse, ApiError> {
        input.validate()?;
        let spec =
            RequestSpec::get(format!("{}/types/accommodations", CONTENT_API)).with_query(input);
        self.transport.execute(spec).await
    }

    async fn list_destinations(
        &self,
        input: &ListDestinationsInput,
    ) -> Result<ListDestinationsResponse, ApiError> {
        input.validate()?;
        let spec = RequestSpec::get(format!("{}/locations/destinations", CONTENT_API))
            .with_query(input);
        self.transport.execute(spec).await
    }

    async fn list_facilities(
        &self,
        input: &ListFacilitiesInput,
    ) -> Result<ListFacilitiesResponse, ApiError> {
        input.validate()?;
        let spec =
            RequestSpec::get(format!("{}/types/facilities", CONTENT_API)).with_query(input);
        self.transport.execute(spec).await
    }
}
