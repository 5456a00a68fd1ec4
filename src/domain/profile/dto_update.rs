/// Allow-listed profile fields for partial updates.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFieldsUpdate {
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub mobilenumber: Option<String>,
    pub department: Option<String>,
    pub program: Option<String>,
    pub roll: Option<String>,
    pub session: Option<String>,
}

