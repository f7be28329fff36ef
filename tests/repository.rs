use pushkind_salon::domain::client::{NewClient, NewTag};
use pushkind_salon::domain::service::NewService;
use pushkind_salon::domain::stylist::NewStylist;
use pushkind_salon::domain::types::{
    ClientName, DurationHours, Price, ServiceId, ServiceName, StylistEmail, StylistId,
    StylistName, TagName,
};
use pushkind_salon::repository::{
    ClientReader, ClientWriter, DieselRepository, RepositoryError, ServiceListQuery,
    ServiceReader, ServiceWriter, StylistListQuery, StylistReader, StylistWriter,
};

mod common;

fn new_service(name: &str, price: f64, hours: f64) -> NewService {
    NewService {
        name: ServiceName::new(name).expect("valid service name"),
        price: Price::new(price).expect("valid price"),
        duration_hours: DurationHours::new(hours).expect("valid duration"),
        description: None,
    }
}

fn new_stylist(name: &str, active: bool) -> NewStylist {
    NewStylist {
        name: StylistName::new(name).expect("valid stylist name"),
        active,
        phone: None,
        email: None,
        notes: None,
    }
}

#[test]
fn services_are_listed_by_name_and_searchable() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_service(&new_service("Wash", 15.0, 0.5))
        .expect("should create wash");
    repo.create_service(&new_service("Haircut", 20.0, 1.0))
        .expect("should create haircut");

    let (total, services) = repo
        .list_services(ServiceListQuery::default())
        .expect("should list services");
    assert_eq!(total, 2);
    assert_eq!(services[0].name.as_str(), "Haircut");

    let (total, services) = repo
        .list_services(ServiceListQuery::default().search("HAIR"))
        .expect("should search services");
    assert_eq!(total, 1);
    assert_eq!(services[0].name.as_str(), "Haircut");
}

#[test]
fn update_service_overwrites_catalog_values() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_service(&new_service("Haircut", 20.0, 1.0))
        .expect("should create service");
    let mut changed = new_service("Haircut", 25.0, 1.25);
    changed.description = Some("Wash included".try_into().expect("valid description"));

    let updated = repo
        .update_service(created.id, &changed)
        .expect("should update service");

    assert_eq!(updated.price, 25.0);
    assert_eq!(updated.duration_hours, 1.25);
    assert_eq!(
        updated.description.as_ref().map(|d| d.as_str()),
        Some("Wash included")
    );
}

#[test]
fn updating_missing_service_is_not_found() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let result = repo.update_service(
        ServiceId::new(42).expect("valid id"),
        &new_service("Ghost", 1.0, 1.0),
    );

    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[test]
fn stylists_can_be_filtered_by_active_flag() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let mut lucia = new_stylist("Lucía", true);
    lucia.email = Some(StylistEmail::new("lucia@example.com").expect("valid email"));
    let lucia = repo.create_stylist(&lucia).expect("should create stylist");
    repo.create_stylist(&new_stylist("Marta", false))
        .expect("should create stylist");

    assert_eq!(lucia.total_appointments, 0);
    assert_eq!(
        lucia.email.as_ref().map(|e| e.as_str()),
        Some("lucia@example.com")
    );

    let (total, active) = repo
        .list_stylists(StylistListQuery::default().active_only())
        .expect("should list stylists");
    assert_eq!(total, 1);
    assert_eq!(active[0].id, lucia.id);

    let missing = repo
        .get_stylist_by_id(StylistId::new(99).expect("valid id"))
        .expect("should query stylist");
    assert!(missing.is_none());
}

#[test]
fn client_tags_are_attached_once_and_detached_by_name() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let client = repo
        .create_client(&NewClient {
            name: ClientName::new("Ana").expect("valid client name"),
            is_company: false,
        })
        .expect("should create client");
    let regular = NewTag {
        name: TagName::new("Regular").expect("valid tag name"),
        color: 2,
    };

    repo.add_client_tag(client.id, &regular)
        .expect("should tag client");
    let tagged = repo
        .add_client_tag(client.id, &regular)
        .expect("tagging twice should be a no-op");
    assert_eq!(tagged.tags.len(), 1);
    assert_eq!(tagged.tags[0].color, 2);

    let registered = repo
        .get_tag_by_name(&regular.name)
        .expect("should query tag")
        .expect("tag should be registered");
    assert_eq!(registered.name.as_str(), "Regular");

    let untagged = repo
        .remove_client_tag(client.id, &regular.name)
        .expect("should untag client");
    assert!(untagged.tags.is_empty());
}

#[test]
fn ensure_tag_keeps_the_first_color() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .ensure_tag(&NewTag {
            name: TagName::new("VIP").expect("valid tag name"),
            color: 3,
        })
        .expect("should create tag");
    let second = repo
        .ensure_tag(&NewTag {
            name: TagName::new("VIP").expect("valid tag name"),
            color: 7,
        })
        .expect("should reuse tag");

    assert_eq!(first.id, second.id);
    assert_eq!(second.color, 3);
}
