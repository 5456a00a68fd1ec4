/// Fields accepted when a profile is first created.
///
/// Role is deliberately absent: new profiles always start as [`super::Role::User`].
#[derive(Debug, Clone, Default)]
pub struct NewProfileDto {
    pub email: String,
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub mobilenumber: Option<String>,
    pub department: Option<String>,
    pub program: Option<String>,
    pub roll: Option<String>,
    pub session: Option<String>,
}
