use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::models::{Preferences, Profile};

/// Everything the hard-filter stage needs besides the candidate.
///
/// Hard filters remove a candidate from consideration before any
/// scoring work. Inputs are assumed validated (see
/// `Preferences::validate`); the checks here are total.
pub struct FilterContext<'a> {
    pub requester_id: &'a str,
    pub preferences: &'a Preferences,
    /// Ids the requester has already interacted with.
    pub excluded: &'a HashSet<String>,
    pub today: NaiveDate,
    /// Hard distance cutoff stage. Independent of the soft distance
    /// score, which always applies to survivors.
    pub apply_hard_distance_filter: bool,
    /// Search-only refinements; all default to off.
    pub refinements: Refinements<'a>,
}

/// Optional search refinements applied as additional hard filters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Refinements<'a> {
    pub has_photos: Option<bool>,
    pub is_premium: Option<bool>,
    pub active_since: Option<chrono::DateTime<chrono::Utc>>,
    /// Plain case-insensitive substring test against the display name
    /// and bio. Not a full-text engine.
    pub keyword: Option<&'a str>,
}

/// Whether a candidate survives the hard-filter stage.
///
/// `distance_km` is the precomputed requester-candidate distance, or
/// `None` when either side has no coordinates.
pub fn is_eligible(candidate: &Profile, distance_km: Option<f64>, ctx: &FilterContext) -> bool {
    // Never rank the requester against themselves.
    if candidate.id == ctx.requester_id {
        return false;
    }

    if ctx.excluded.contains(&candidate.id) {
        return false;
    }

    if let Some(wanted_gender) = &ctx.preferences.gender {
        match &candidate.gender {
            Some(g) if g == wanted_gender => {}
            // Undeclared gender cannot satisfy a declared requirement.
            _ => return false,
        }
    }

    if !birth_date_in_window(candidate, ctx) {
        return false;
    }

    // The profile service cannot push interest containment down, so
    // candidates sharing nothing with an explicit interest set are
    // rejected here before scoring.
    if !ctx.preferences.interests.is_empty()
        && !candidate
            .interests
            .iter()
            .any(|i| ctx.preferences.interests.contains(i))
    {
        return false;
    }

    if ctx.apply_hard_distance_filter {
        if let Some(d) = distance_km {
            if d > ctx.preferences.max_distance_km {
                return false;
            }
        }
    }

    passes_refinements(candidate, &ctx.refinements)
}

/// Age-range check expressed as a birth-date window. A candidate with
/// no birth date on file cannot be excluded on age.
fn birth_date_in_window(candidate: &Profile, ctx: &FilterContext) -> bool {
    let Some(birth_date) = candidate.birth_date else {
        return true;
    };

    // Born on or before this date: at least age_min years old.
    let latest = shift_years(ctx.today, -(ctx.preferences.age_min as i32));
    // Born after this date: not yet age_max + 1 years old.
    let earliest = shift_years(ctx.today, -(ctx.preferences.age_max as i32 + 1));

    birth_date <= latest && birth_date > earliest
}

/// Shift a date by whole years, clamping Feb 29 to Feb 28 when the
/// target year is not a leap year.
fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

fn passes_refinements(candidate: &Profile, refinements: &Refinements) -> bool {
    if let Some(wanted) = refinements.has_photos {
        if candidate.photo_ids.is_empty() == wanted {
            return false;
        }
    }

    if let Some(wanted) = refinements.is_premium {
        if candidate.is_premium != wanted {
            return false;
        }
    }

    if let Some(cutoff) = refinements.active_since {
        match candidate.last_active_at {
            Some(at) if at >= cutoff => {}
            _ => return false,
        }
    }

    if let Some(keyword) = refinements.keyword {
        let needle = keyword.to_lowercase();
        let in_name = candidate.display_name.to_lowercase().contains(&needle);
        let in_bio = candidate
            .bio
            .as_deref()
            .map(|b| b.to_lowercase().contains(&needle))
            .unwrap_or(false);
        if !in_name && !in_bio {
            return false;
        }
    }

    true
}
