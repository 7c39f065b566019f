use color_eyre::eyre::{Context, Result};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactId(Uuid);

impl ContactId {
    pub fn parse(id: &str) -> Result<Self> {
        let parsed =
            uuid::Uuid::try_parse(id).wrap_err("Invalid contact ID")?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for ContactId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[test]
fn test_valid_ids() {
    let valid_id = "1f0cdf0e-depb-4b1f-a7be-5b0bbd23a7a5";
    let result = ContactId::parse(valid_id);
    let error = result.expect_err("ID with non-hex characters should fail");
    assert_eq!(error.to_string(), "Invalid contact ID");

    let valid_id = "1f0cdf0e-deab-4b1f-a7be-5b0bbd23a7a5";
    let parsed = ContactId::parse(valid_id).expect(valid_id);
    assert_eq!(
        parsed.as_ref().to_string(),
        valid_id,
        "ID does not match expected value"
    );
}
