//! Conversion of Places API wire types into domain candidate types.

use stationdb_core::{CandidateDetails, CandidateSummary};

use crate::types::{LocalizedText, PlaceDetailsResponse, PlaceSummary};

fn display_text(name: Option<LocalizedText>) -> Option<String> {
    name.and_then(|n| n.text)
}

/// Converts a search hit into a [`CandidateSummary`].
#[must_use]
pub fn normalize_summary(place: PlaceSummary) -> CandidateSummary {
    CandidateSummary {
        id: place.id,
        name: display_text(place.display_name),
        formatted_address: place.formatted_address,
    }
}

/// Converts a details response into [`CandidateDetails`], one field at a time.
#[must_use]
pub fn normalize_details(details: PlaceDetailsResponse) -> CandidateDetails {
    CandidateDetails {
        id: details.id,
        name: display_text(details.display_name),
        formatted_address: details.formatted_address,
        national_phone: details.national_phone_number,
        international_phone: details.international_phone_number,
        website: details.website_uri,
        maps_url: details.google_maps_uri,
        rating: details.rating,
        rating_count: details.user_rating_count,
        business_status: details.business_status,
        types: details.types,
        opening_hours: details.current_opening_hours,
        accessibility: details.accessibility_options,
    }
}
