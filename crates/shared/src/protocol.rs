use serde::{Deserialize, Serialize};

use crate::domain::{Address, Company, Person, PersonId};

/// Request body for create (POST) and update (PUT).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl PersonDraft {
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            company: self.company,
        }
    }
}

impl From<&Person> for PersonDraft {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            email: person.email.clone(),
            phone: person.phone.clone(),
            address: person.address.clone(),
            company: person.company.clone(),
        }
    }
}

/// Update response body. Servers may echo only part of the entity, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
    #[serde(default)]
    pub id: Option<PersonId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub company: Option<Company>,
}

impl PersonPatch {
    /// Overwrites the fields present in the patch. The identifier is never changed.
    pub fn apply_to(self, person: &mut Person) {
        if let Some(name) = self.name {
            person.name = name;
        }
        if let Some(email) = self.email {
            person.email = email;
        }
        if let Some(phone) = self.phone {
            person.phone = phone;
        }
        if let Some(address) = self.address {
            person.address = Some(address);
        }
        if let Some(company) = self.company {
            person.company = Some(company);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_person() -> Person {
        Person {
            id: PersonId(4),
            name: "Patricia Lebsack".to_string(),
            email: "julianne@kory.org".to_string(),
            phone: "493-170-9623".to_string(),
            address: Some(Address {
                street: "Hoeger Mall".to_string(),
                city: "South Elvis".to_string(),
                zipcode: "53919".to_string(),
            }),
            company: Some(Company {
                name: "Robel-Corkery".to_string(),
                catch_phrase: Some("Multi-tiered zero tolerance productivity".to_string()),
            }),
        }
    }

    #[test]
    fn patch_keeps_fields_missing_from_response() {
        let mut person = sample_person();
        let patch: PersonPatch =
            serde_json::from_str(r#"{"id": 4, "email": "patricia@example.com"}"#).expect("patch");

        patch.apply_to(&mut person);

        assert_eq!(person.email, "patricia@example.com");
        assert_eq!(person.name, "Patricia Lebsack");
        assert_eq!(
            person.company_name(),
            Some("Robel-Corkery"),
            "company must survive a partial response"
        );
    }

    #[test]
    fn person_tolerates_missing_and_extra_fields() {
        let person: Person = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Leanne Graham",
                "username": "Bret",
                "email": "Sincere@april.biz",
                "phone": "1-770-736-8031 x56442",
                "address": {"street": "Kulas Light", "suite": "Apt. 556", "city": "Gwenborough",
                            "zipcode": "92998-3874", "geo": {"lat": "-37.3159", "lng": "81.1496"}},
                "company": {"name": "Romaguera-Crona", "catchPhrase": "Multi-layered client-server neural-net"}
            }"#,
        )
        .expect("decode");

        assert_eq!(person.id, PersonId(1));
        assert_eq!(person.city(), Some("Gwenborough"));
        assert_eq!(
            person.company.and_then(|company| company.catch_phrase).as_deref(),
            Some("Multi-layered client-server neural-net")
        );

        let bare: Person = serde_json::from_str(
            r#"{"id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv", "phone": "010-692-6593"}"#,
        )
        .expect("decode bare");
        assert!(bare.address.is_none());
        assert!(bare.company_name().is_none());
    }

    #[test]
    fn draft_serializes_catch_phrase_in_camel_case() {
        let draft = PersonDraft::from(&sample_person());
        let json = serde_json::to_value(&draft).expect("encode");
        assert!(json.get("id").is_none());
        assert_eq!(
            json["company"]["catchPhrase"],
            "Multi-tiered zero tolerance productivity"
        );
    }
}
