//! Canonical fingerprint hashing via `ring::digest`.

use devtrust_core::{DeviceFingerprint, SensorKind};
use ring::digest::{digest, SHA256};

/// SHA-256 of a fingerprint's canonical form, lowercase hex.
///
/// The material is `sensors | cpu_gpu_id | macs`, with sensors in fixed
/// order and MAC addresses sorted, so two fingerprints that carry the same
/// signals always hash the same. Every field is tagged absent/present and
/// length-prefixed, so no free-form value can collide with another layout.
#[must_use]
pub fn fingerprint_hash(fingerprint: &DeviceFingerprint) -> String {
    let mut material = Vec::new();

    // Sensor vectors in canonical order; absent sensors still take a slot
    for kind in SensorKind::ALL {
        push_bytes(&mut material, kind.to_string().as_bytes());
        match fingerprint.sensor_patterns.get(kind) {
            Some(samples) => {
                material.push(PRESENT);
                push_len(&mut material, samples.len());
                for v in samples {
                    material.extend_from_slice(&v.to_bits().to_be_bytes());
                }
            }
            None => material.push(ABSENT),
        }
    }
    material.extend_from_slice(b"|");

    // CPU/GPU identifier
    match &fingerprint.cpu_gpu_id {
        Some(id) => {
            material.push(PRESENT);
            push_bytes(&mut material, id.as_bytes());
        }
        None => material.push(ABSENT),
    }
    material.extend_from_slice(b"|");

    // MAC addresses (BTreeSet iterates sorted)
    push_len(&mut material, fingerprint.mac_addresses.len());
    for mac in &fingerprint.mac_addresses {
        push_bytes(&mut material, mac.as_bytes());
    }

    hex::encode(digest(&SHA256, &material).as_ref())
}

const ABSENT: u8 = 0;
const PRESENT: u8 = 1;

fn push_len(material: &mut Vec<u8>, len: usize) {
    material.extend_from_slice(&u64::try_from(len).unwrap_or(u64::MAX).to_be_bytes());
}

fn push_bytes(material: &mut Vec<u8>, bytes: &[u8]) {
    push_len(material, bytes.len());
    material.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtrust_core::SensorPatterns;

    fn sample() -> DeviceFingerprint {
        DeviceFingerprint {
            sensor_patterns: SensorPatterns {
                accelerometer: Some(vec![0.01, -0.02, 9.81]),
                gyroscope: None,
                magnetometer: Some(vec![22.5, -4.0, 41.2]),
            },
            cpu_gpu_id: Some("qcom-sm8550-adreno740".into()),
            mac_addresses: ["a4:83:e7:11:22:33", "02:00:00:00:00:01"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    #[test]
    fn hash_is_stable_hex() {
        let hash = fingerprint_hash(&sample());
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, fingerprint_hash(&sample()));
    }

    #[test]
    fn mac_order_is_irrelevant() {
        let reordered: DeviceFingerprint = serde_json::from_value(serde_json::json!({
            "sensor_patterns": {
                "accelerometer": [0.01, -0.02, 9.81],
                "magnetometer": [22.5, -4.0, 41.2]
            },
            "cpu_gpu_id": "qcom-sm8550-adreno740",
            "mac_addresses": ["02:00:00:00:00:01", "a4:83:e7:11:22:33"]
        }))
        .unwrap();
        assert_eq!(fingerprint_hash(&reordered), fingerprint_hash(&sample()));
    }

    #[test]
    fn any_signal_change_changes_hash() {
        let base = fingerprint_hash(&sample());

        let mut fp = sample();
        fp.cpu_gpu_id = None;
        assert_ne!(fingerprint_hash(&fp), base);

        let mut fp = sample();
        fp.sensor_patterns.gyroscope = Some(vec![]);
        assert_ne!(fingerprint_hash(&fp), base);

        let mut fp = sample();
        fp.mac_addresses.insert("ff:ff:ff:ff:ff:ff".into());
        assert_ne!(fingerprint_hash(&fp), base);
    }

    #[test]
    fn absent_fields_never_collide_with_values() {
        let mut absent = sample();
        absent.cpu_gpu_id = None;
        let mut dash = sample();
        dash.cpu_gpu_id = Some("-".into());
        let mut blank = sample();
        blank.cpu_gpu_id = Some(String::new());
        assert_ne!(fingerprint_hash(&absent), fingerprint_hash(&dash));
        assert_ne!(fingerprint_hash(&absent), fingerprint_hash(&blank));

        let mut no_gyro = sample();
        no_gyro.sensor_patterns.gyroscope = None;
        let mut empty_gyro = sample();
        empty_gyro.sensor_patterns.gyroscope = Some(Vec::new());
        assert_ne!(fingerprint_hash(&no_gyro), fingerprint_hash(&empty_gyro));
    }

    #[test]
    fn mac_boundaries_are_unambiguous() {
        let joined = DeviceFingerprint {
            mac_addresses: ["aa,bb".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let split = DeviceFingerprint {
            mac_addresses: ["aa".to_string(), "bb".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let one_split = DeviceFingerprint {
            mac_addresses: ["aa,".to_string(), "bb".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_ne!(fingerprint_hash(&joined), fingerprint_hash(&split));
        assert_ne!(fingerprint_hash(&one_split), fingerprint_hash(&split));
    }
}
