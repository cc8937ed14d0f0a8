// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{MemberId, Role, TeamMember};

/// Returns the five-member reference roster used to seed a new planning session.
///
/// The roster is valid and balanced: 24 coding tasks, 35 QA capacity and
/// 14 sampling tasks.
#[must_use]
pub fn sample_roster() -> Vec<TeamMember> {
    vec![
        TeamMember::new(MemberId::new(1), String::from("John"), Role::Coder, 8, 0, 6, 8, 9),
        TeamMember::new(MemberId::new(2), String::from("Mary"), Role::Coder, 10, 0, 8, 10, 13),
        TeamMember::new(MemberId::new(3), String::from("Yadulla"), Role::Qa, 0, 15, 0, 15, 17),
        TeamMember::new(MemberId::new(4), String::from("Sufiyan"), Role::Qa, 0, 12, 0, 12, 14),
        TeamMember::new(MemberId::new(5), String::from("Anil"), Role::CoderQa, 6, 8, 0, 14, 16),
    ]
}
