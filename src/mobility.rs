//! Mobility-type classification of partnerships.

use crate::domain::MobilityFlags;

pub fn is_student(flags: &MobilityFlags) -> bool {
    flags.is_sms || flags.is_smp || flags.is_smst
}

pub fn is_staff(flags: &MobilityFlags) -> bool {
    flags.is_sta || flags.is_stt
}

/// Derive the display string for a set of mobility flags.
///
/// `"Student (studies, short term), Staff"`, `"Staff"`, or `""` when no flag
/// is set.
pub fn mobility_type(flags: &MobilityFlags) -> String {
    let student = is_student(flags);
    let staff = is_staff(flags);

    if student {
        let subtypes: Vec<&str> = [
            (flags.is_sms, "studies"),
            (flags.is_smp, "training"),
            (flags.is_smst, "short term"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect();

        let mut out = format!("Student ({})", subtypes.join(", "));
        if staff {
            out.push_str(", Staff");
        }
        return out;
    }

    if staff {
        return "Staff".to_string();
    }

    String::new()
}
