use crate::domain::{
    Contact, ContactId, ContactStore, ContactStoreError, UserId,
};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapContactStore {
    contacts: HashMap<ContactId, Contact>,
}

#[async_trait::async_trait]
impl ContactStore for HashmapContactStore {
    async fn add_contact(
        &mut self,
        contact: Contact,
    ) -> Result<(), ContactStoreError> {
        self.contacts.insert(contact.id.clone(), contact);
        Ok(())
    }

    async fn get_contact(
        &self,
        owner: &UserId,
        id: &ContactId,
    ) -> Result<Contact, ContactStoreError> {
        match self.contacts.get(id) {
            Some(contact) if contact.user_id == *owner => {
                Ok(contact.clone())
            }
            // Someone else's contact looks exactly like a missing one
            _ => Err(ContactStoreError::ContactNotFound),
        }
    }

    async fn list_contacts(
        &self,
        owner: &UserId,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError> {
        let mut contacts: Vec<Contact> = self
            .contacts
            .values()
            .filter(|contact| contact.user_id == *owner)
            .filter(|contact| match search {
                Some(term) => contact.matches_search(term),
                None => true,
            })
            .cloned()
            .collect();

        contacts.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
        Ok(contacts)
    }

    async fn update_contact(
        &mut self,
        owner: &UserId,
        contact: Contact,
    ) -> Result<(), ContactStoreError> {
        self.get_contact(owner, &contact.id).await?;
        self.contacts.insert(contact.id.clone(), contact);
        Ok(())
    }

    async fn delete_contact(
        &mut self,
        owner: &UserId,
        id: &ContactId,
    ) -> Result<(), ContactStoreError> {
        self.get_contact(owner, id).await?;
        self.contacts.remove(id);
        Ok(())
    }

    async fn delete_contacts_for_user(
        &mut self,
        owner: &UserId,
    ) -> Result<(), ContactStoreError> {
        self.contacts
            .retain(|_, contact| contact.user_id != *owner);
        Ok(())
    }
}
