//! Client Registry (SOAP) demographics delegate.
//!
//! Sends an `HCIM_IN_GetDemographics` query keyed by HDID or PHN and turns the reply into a
//! [`PatientModel`]. The reply schema belongs to the registry; this module only reads the parts
//! the gateway needs:
//!
//! - `queryAck/queryResponseCode@code` decides success, warning, not-found or failure
//! - `identifiedPerson/name` supplies the commercial (`C`) or legal (`L`) name
//! - `id` elements (subject, person, `asOtherIDs`) are classified by OID into HDID and PHN
//! - `addr` elements with use `PHYS` / `PST` become the physical and postal addresses

use crate::constants::{
    CR_INVALID_PHN, CR_NOT_FOUND, CR_SUCCESS_PREFIX, CR_WARNING_CODES, OID_HDID, OID_PHN,
};
use crate::models::{Address, Name, PatientIdentifierType, PatientModel};
use crate::request_result::{ActionType, ErrorType, RequestResult, ServiceType};
use crate::xml::XmlElement;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::CONTENT_TYPE;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRegistryDelegate: Send + Sync {
    /// Look up a person's demographics.
    ///
    /// When `disable_id_validation` is set the returned identifiers are not checked against the
    /// requested one.
    async fn get_demographics(
        &self,
        identifier_type: PatientIdentifierType,
        identifier: &str,
        disable_id_validation: bool,
    ) -> RequestResult<PatientModel>;
}

/// SOAP implementation over `reqwest`.
#[derive(Clone)]
pub struct SoapClientRegistryDelegate {
    client: reqwest::Client,
    endpoint: String,
}

impl SoapClientRegistryDelegate {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ClientRegistryDelegate for SoapClientRegistryDelegate {
    async fn get_demographics(
        &self,
        identifier_type: PatientIdentifierType,
        identifier: &str,
        disable_id_validation: bool,
    ) -> RequestResult<PatientModel> {
        tracing::debug!("querying client registry by {}", identifier_type.as_str());

        let message_id = uuid::Uuid::new_v4().simple().to_string();
        let body = build_request(identifier_type, identifier, &message_id);

        let response = match self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "HCIM_IN_GetDemographics")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("client registry request failed: {}", e);
                return RequestResult::service_error(
                    ErrorType::CommunicationExternal,
                    ServiceType::ClientRegistries,
                    "Unable to connect to the Client Registry",
                );
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!("client registry returned http status {}", status);
            return RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::ClientRegistries,
                format!("Client Registry returned HTTP status {}", status.as_u16()),
            );
        }

        match response.text().await {
            Ok(xml) => {
                parse_demographics_response(&xml, identifier_type, identifier, disable_id_validation)
            }
            Err(e) => {
                tracing::error!("unable to read client registry response: {}", e);
                RequestResult::service_error(
                    ErrorType::CommunicationExternal,
                    ServiceType::ClientRegistries,
                    "Unable to read the Client Registry response",
                )
            }
        }
    }
}

fn build_request(identifier_type: PatientIdentifierType, identifier: &str, message_id: &str) -> String {
    let oid = match identifier_type {
        PatientIdentifierType::Hdid => OID_HDID,
        PatientIdentifierType::Phn => OID_PHN,
    };
    let identifier = quick_xml::escape::escape(identifier);
    let created = chrono::Utc::now().format("%Y%m%d%H%M%S");

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <HCIM_IN_GetDemographics xmlns="urn:hl7-org:v3" ITSVersion="XML_1.0">
      <id root="2.16.840.1.113883.3.51.1.1.1" extension="{message_id}"/>
      <creationTime value="{created}"/>
      <interactionId root="2.16.840.1.113883.3.51.1.1.2" extension="HCIM_IN_GetDemographics"/>
      <processingCode code="P"/>
      <acceptAckCode code="NE"/>
      <controlActProcess classCode="ACCM" moodCode="EVN">
        <queryByParameter>
          <queryByParameterPayload>
            <person.id value="" root="{oid}" extension="{identifier}"/>
          </queryByParameterPayload>
        </queryByParameter>
      </controlActProcess>
    </HCIM_IN_GetDemographics>
  </soap:Body>
</soap:Envelope>"#
    )
}

/// Interpret a Client Registry demographics reply.
pub(crate) fn parse_demographics_response(
    xml: &str,
    identifier_type: PatientIdentifierType,
    identifier: &str,
    disable_id_validation: bool,
) -> RequestResult<PatientModel> {
    let root = match XmlElement::parse(xml) {
        Ok(root) => root,
        Err(e) => {
            tracing::error!("unable to parse client registry response: {}", e);
            return RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::ClientRegistries,
                "Unable to parse the Client Registry response",
            );
        }
    };

    let Some(response_code) = root
        .find("queryResponseCode")
        .and_then(|e| e.attr("code"))
        .map(str::to_string)
    else {
        return RequestResult::service_error(
            ErrorType::ClientRegistryReturnedError,
            ServiceType::ClientRegistries,
            "Client Registry response is missing a response code",
        );
    };

    if response_code == CR_NOT_FOUND {
        return RequestResult::service_error(
            ErrorType::ClientRegistryRecordsNotFound,
            ServiceType::ClientRegistries,
            "Client Registry did not find any records",
        );
    }
    if response_code == CR_INVALID_PHN {
        let mut result = RequestResult::service_error(
            ErrorType::InvalidState,
            ServiceType::ClientRegistries,
            "Client Registry rejected the PHN",
        );
        if let Some(error) = result.result_error.as_mut() {
            error.action_code = Some(ActionType::Validation);
        }
        return result;
    }
    let is_warning = CR_WARNING_CODES.contains(&response_code.as_str());
    if !response_code.starts_with(CR_SUCCESS_PREFIX) && !is_warning {
        tracing::warn!("client registry returned response code {}", response_code);
        return RequestResult::service_error(
            ErrorType::ClientRegistryReturnedError,
            ServiceType::ClientRegistries,
            format!("Client Registry returned response code {response_code}"),
        );
    }
    if is_warning {
        tracing::info!("client registry returned warning {}", response_code);
    }

    let target = root.find("target");
    let Some(person) = root.find("identifiedPerson") else {
        return RequestResult::service_error(
            ErrorType::ClientRegistryDoesNotReturnPerson,
            ServiceType::ClientRegistries,
            "Client Registry did not return a person",
        );
    };

    let (hdid, phn) = identifiers(target, person);

    if !disable_id_validation {
        match identifier_type {
            PatientIdentifierType::Hdid => match &hdid {
                None => {
                    return RequestResult::action_required(
                        ActionType::NoHdid,
                        "Client Registry did not return an HDID",
                        None,
                    );
                }
                Some(found) if !found.eq_ignore_ascii_case(identifier) => {
                    return RequestResult::service_error(
                        ErrorType::ClientRegistryDoesNotReturnPerson,
                        ServiceType::ClientRegistries,
                        "Client Registry returned a person with a different HDID",
                    );
                }
                Some(_) => {}
            },
            PatientIdentifierType::Phn => match &phn {
                Some(found) if found == identifier => {}
                Some(_) => {
                    return RequestResult::service_error(
                        ErrorType::ClientRegistryDoesNotReturnPerson,
                        ServiceType::ClientRegistries,
                        "Client Registry returned a person with a different PHN",
                    );
                }
                None => {
                    return RequestResult::service_error(
                        ErrorType::ClientRegistryDoesNotReturnPerson,
                        ServiceType::ClientRegistries,
                        "Client Registry did not return a PHN",
                    );
                }
            },
        }
    }

    let common_name = select_name(person, "C");
    let legal_name = select_name(person, "L");
    let primary = common_name
        .clone()
        .or_else(|| legal_name.clone())
        .or_else(|| person.child("name").map(read_name))
        .unwrap_or_default();

    let birthdate = person
        .child("birthTime")
        .and_then(|e| e.attr("value"))
        .and_then(|v| v.get(0..8))
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y%m%d").ok());

    let gender = match person
        .child("administrativeGenderCode")
        .and_then(|e| e.attr("code"))
    {
        Some("M") => "Male",
        Some("F") => "Female",
        _ => "NotSpecified",
    };

    let is_deceased = person
        .child("deceasedInd")
        .and_then(|e| e.attr("value"))
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    RequestResult::success(PatientModel {
        hdid: hdid.unwrap_or_default(),
        phn: phn.unwrap_or_default(),
        first_name: primary.given_name,
        last_name: primary.surname,
        birthdate,
        gender: gender.to_string(),
        common_name,
        legal_name,
        physical_address: select_address(person, "PHYS"),
        postal_address: select_address(person, "PST"),
        response_code,
        is_deceased,
    })
}

/// Collect the first HDID and PHN found on the subject, the person, or its other ids.
fn identifiers(target: Option<&XmlElement>, person: &XmlElement) -> (Option<String>, Option<String>) {
    let mut ids: Vec<&XmlElement> = Vec::new();
    if let Some(target) = target {
        ids.extend(target.children_named("id"));
    }
    ids.extend(person.children_named("id"));
    for other in person.children_named("asOtherIDs") {
        ids.extend(other.children_named("id"));
    }

    let mut hdid = None;
    let mut phn = None;
    for id in ids {
        let Some(extension) = id.attr("extension").filter(|e| !e.is_empty()) else {
            continue;
        };
        match id.attr("root") {
            Some(OID_HDID) if hdid.is_none() => hdid = Some(extension.to_string()),
            Some(OID_PHN) if phn.is_none() => phn = Some(extension.to_string()),
            _ => {}
        }
    }
    (hdid, phn)
}

fn has_use(element: &XmlElement, code: &str) -> bool {
    element
        .attr("use")
        .is_some_and(|uses| uses.split_whitespace().any(|u| u == code))
}

fn select_name(person: &XmlElement, use_code: &str) -> Option<Name> {
    person
        .children_named("name")
        .find(|n| has_use(n, use_code))
        .map(read_name)
}

fn read_name(name: &XmlElement) -> Name {
    let given: Vec<&str> = name
        .children_named("given")
        .filter(|g| !has_qualifier(g, "CL"))
        .map(|g| g.text.trim())
        .filter(|t| !t.is_empty())
        .collect();
    let family: Vec<&str> = name
        .children_named("family")
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect();
    Name {
        given_name: given.join(" "),
        surname: family.join(" "),
    }
}

fn has_qualifier(element: &XmlElement, code: &str) -> bool {
    element
        .attr("qualifier")
        .is_some_and(|q| q.split_whitespace().any(|v| v == code))
}

fn select_address(person: &XmlElement, use_code: &str) -> Option<Address> {
    let addr = person.children_named("addr").find(|a| has_use(a, use_code))?;
    let text = |name: &str| {
        addr.child(name)
            .map(|e| e.text.trim().to_string())
            .unwrap_or_default()
    };
    Some(Address {
        street_lines: addr
            .children_named("streetAddressLine")
            .map(|l| l.text.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        city: text("city"),
        state: text("state"),
        postal_code: text("postalCode"),
        country: text("country"),
    })
}
